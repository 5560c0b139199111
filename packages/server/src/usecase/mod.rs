//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod authenticate_connection;
pub mod edit_room;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod reap_idle_rooms;

pub use authenticate_connection::{
    AuthenticateConnectionUseCase, AuthenticatedConnection, ConnectionCredentials,
};
pub use edit_room::EditRoomUseCase;
pub use error::{AuthError, GetRoomDetailError, JoinError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use reap_idle_rooms::ReapIdleRoomsUseCase;
