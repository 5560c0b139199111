//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ルームのスナップショットを取得
    ///
    /// # Returns
    ///
    /// ルーム ID でソート済みのスナップショットのリスト
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.repository.list_rooms().await;

        // Sort by room id for consistent ordering
        rooms.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

        rooms
    }
}
