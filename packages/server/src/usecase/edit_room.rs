//! UseCase: ルーム編集処理
//!
//! コード・言語・ノート・ファイル一覧の更新とカーソルのリレー。
//! すべての更新は全置換（last write wins）で、適用された場合にのみ
//! 送信者以外のルームメンバーへブロードキャストされる。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EditRoomUseCase の各更新メソッドと relay_cursor()
//! - 更新の適用有無（EditOutcome）とブロードキャスト対象の選定
//!
//! ### なぜこのテストが必要か
//! - 「送信者に自身の編集がエコーバックされない」ことはクライアントの
//!   表示の一貫性の前提になる
//! - 存在しないルーム・ファイルへの更新が状態を変えず、ブロードキャスト
//!   も発生しないことを保証（silent no-op）
//!
//! ### どのような状況を想定しているか
//! - 正常系：各種更新と送信者以外へのブロードキャスト
//! - 異常系：未知のルーム・ファイルへの更新
//! - エッジケース：送信者のみが参加しているルームでの更新

use std::sync::Arc;

use crate::domain::{
    ConnectionId, EditOutcome, FileId, MessagePusher, RoomFile, RoomId, RoomRepository,
};

/// ルーム編集のユースケース
pub struct EditRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl EditRoomUseCase {
    /// 新しい EditRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ファイル内容を全置換し、適用されたら送信者以外へブロードキャスト
    pub async fn update_code(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        new_code: String,
        origin: &ConnectionId,
        message: &str,
    ) -> EditOutcome {
        let outcome = self
            .repository
            .update_file_content(room_id, file_id, new_code)
            .await;
        if outcome.is_applied() {
            self.broadcast_except(room_id, origin, message).await;
        }
        outcome
    }

    /// ファイルの言語タグを更新し、適用されたら送信者以外へブロードキャスト
    pub async fn update_language(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        new_language: String,
        origin: &ConnectionId,
        message: &str,
    ) -> EditOutcome {
        let outcome = self
            .repository
            .update_file_language(room_id, file_id, new_language)
            .await;
        if outcome.is_applied() {
            self.broadcast_except(room_id, origin, message).await;
        }
        outcome
    }

    /// 共有ノートを全置換し、適用されたら送信者以外へブロードキャスト
    pub async fn update_notes(
        &self,
        room_id: &RoomId,
        new_notes: String,
        origin: &ConnectionId,
        message: &str,
    ) -> EditOutcome {
        let outcome = self.repository.replace_notes(room_id, new_notes).await;
        if outcome.is_applied() {
            self.broadcast_except(room_id, origin, message).await;
        }
        outcome
    }

    /// ファイル一覧を全置換し、適用されたら送信者以外へブロードキャスト
    pub async fn replace_files(
        &self,
        room_id: &RoomId,
        files: Vec<RoomFile>,
        origin: &ConnectionId,
        message: &str,
    ) -> EditOutcome {
        let outcome = self.repository.replace_files(room_id, files).await;
        if outcome.is_applied() {
            self.broadcast_except(room_id, origin, message).await;
        }
        outcome
    }

    /// カーソル位置を送信者以外へリレーする。
    ///
    /// ルーム状態には何も保存しない（ephemeral presence signal）。
    /// 未知のルームでは対象が空になり、何も送信されない。
    pub async fn relay_cursor(&self, room_id: &RoomId, origin: &ConnectionId, message: &str) {
        self.broadcast_except(room_id, origin, message).await;
    }

    /// 送信者以外のルームメンバーへブロードキャスト
    async fn broadcast_except(&self, room_id: &RoomId, origin: &ConnectionId, message: &str) {
        let targets: Vec<ConnectionId> = self
            .repository
            .connection_ids(room_id)
            .await
            .into_iter()
            .filter(|id| id != origin)
            .collect();
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.message_pusher.broadcast(targets, message).await {
            tracing::warn!("Failed to broadcast to room '{}': {}", room_id.as_str(), e);
        }
    }
}
