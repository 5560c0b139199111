//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの遅延生成（デフォルトファイル付き）と参加者の追加
//!
//! ### なぜこのテストが必要か
//! - 最初の参加でのみルームが生成されることを保証
//! - デフォルトファイル名が言語タグから解決されることを確認
//! - 1 接続 1 ルームの制約が Join 時に強制されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：既に別ルームに参加済みの接続からの参加試行
//! - エッジケース：同一ユーザーの複数接続（マルチタブ）

use std::sync::Arc;

use dojo_shared::time::get_jst_timestamp;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, Participant, RepositoryError, Room, RoomFile,
    RoomId, RoomRepository, Timestamp, UserId,
};

use super::error::JoinError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルーム参加を実行
    ///
    /// ルームが存在しない場合は、言語タグから解決した拡張子を持つ
    /// デフォルトファイル 1 つと空のノートでルームを生成する。
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 参加後のルームのスナップショット
    /// * `Err(JoinError)` - 参加失敗（接続が既に別ルームに参加済み）
    pub async fn execute(
        &self,
        room_id: RoomId,
        user_id: UserId,
        display_name: String,
        connection_id: ConnectionId,
        language: &str,
    ) -> Result<Room, JoinError> {
        let now = Timestamp::new(get_jst_timestamp());
        let participant = Participant::new(user_id, display_name, connection_id, now);
        let default_file = RoomFile::initial(language);

        let room = self
            .repository
            .join_room(room_id, participant, default_file, now)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyJoined(connection_id) => {
                    JoinError::AlreadyJoined(connection_id)
                }
            })?;

        Ok(room)
    }

    /// 参加者リストの更新をルーム全体（参加者本人を含む）にブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象のルーム
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_users_update(
        &self,
        room_id: &RoomId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        let targets = self.repository.connection_ids(room_id).await;
        self.message_pusher.broadcast(targets, message).await
    }

    /// 参加した接続にのみ現在のルームスナップショットを送信
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加した接続
    /// * `message` - 送信するメッセージ（JSON）
    pub async fn push_to_joiner(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection_id, message).await
    }
}
