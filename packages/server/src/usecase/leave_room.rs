//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 切断された接続の参加者エントリ削除と残メンバーの取得
//!
//! ### なぜこのテストが必要か
//! - 切断がメンバーシップ整合性を保つ唯一のクリーンアップ経路
//! - 退出後の users リストが正しいことを保証（N 人参加 → 1 人退出 → N-1 人）
//! - どのルームにも属さない接続の切断が no-op であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と残メンバーの通知
//! - エッジケース：最後の参加者の退出（ルームは空のまま残る）
//! - 異常系：未参加の接続の切断

use std::sync::Arc;

use dojo_shared::time::get_jst_timestamp;

use crate::domain::{
    ConnectionId, DepartedRoom, MessagePushError, MessagePusher, RoomId, RoomRepository, Timestamp,
};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    ///
    /// 接続が参加しているルームから参加者エントリを削除する。
    /// ルーム自体は空になっても削除されない（アイドルルームの回収は
    /// 別ポリシー）。
    ///
    /// # Returns
    ///
    /// * `Some(DepartedRoom)` - 退出したルームと残メンバーのリスト
    /// * `None` - 接続はどのルームにも参加していなかった
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<DepartedRoom> {
        let now = Timestamp::new(get_jst_timestamp());
        self.repository.leave_by_connection(connection_id, now).await
    }

    /// 参加者リストの更新を残メンバー全員にブロードキャスト
    pub async fn broadcast_users_update(
        &self,
        room_id: &RoomId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        let targets = self.repository.connection_ids(room_id).await;
        self.message_pusher.broadcast(targets, message).await
    }
}
