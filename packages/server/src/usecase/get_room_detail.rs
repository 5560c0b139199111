//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 指定されたルームのスナップショットを取得
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - ルームのスナップショット
    /// * `Err(GetRoomDetailError::RoomNotFound)` - ルームが存在しない
    ///   （不正な形式のルーム ID も存在しない扱いになる）
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&room_id)
            .await
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}
