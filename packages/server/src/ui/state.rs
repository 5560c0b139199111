//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::domain::MessagePusher;
use crate::usecase::{
    AuthenticateConnectionUseCase, EditRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    JoinRoomUseCase, LeaveRoomUseCase,
};

/// Shared application state
pub struct AppState {
    /// AuthenticateConnectionUseCase（接続認証のユースケース）
    pub authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// EditRoomUseCase（ルーム編集のユースケース）
    pub edit_room_usecase: Arc<EditRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// MessagePusher（接続ライフサイクルでのチャンネル登録・解除に使用）
    pub message_pusher: Arc<dyn MessagePusher>,
}
