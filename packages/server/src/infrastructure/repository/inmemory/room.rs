//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリのルームレジストリとして使用します。
//!
//! レジストリはプロセスローカルで永続化を持たず、クラッシュで全ルーム
//! 状態が失われることは設計上許容されています。複数プロセスへの水平
//! スケールは対象外です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DepartedRoom, EditOutcome, FileId, Participant, RepositoryError, Room, RoomFile,
    RoomId, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// ルームレジストリを単一の Mutex で保持し、各操作をロック取得の中で
/// 完結させることでルームへの変更を到着順に直列化します。
/// テストではインスタンスを個別に生成して分離されたレジストリを使えます。
pub struct InMemoryRoomRepository {
    /// Room ドメインモデルのレジストリ（key: RoomId）
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join_room(
        &self,
        room_id: RoomId,
        participant: Participant,
        default_file: RoomFile,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.lock().await;

        // 1 接続 1 ルーム: 既にどこかのルームに参加している接続は拒否する
        if rooms
            .values()
            .any(|room| room.has_connection(&participant.connection_id))
        {
            return Err(RepositoryError::AlreadyJoined(
                participant.connection_id.as_str().to_string(),
            ));
        }

        let room = rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id, default_file, created_at));
        room.add_participant(participant).map_err(|e| match e {
            crate::domain::RoomError::DuplicateConnection { connection_id } => {
                RepositoryError::AlreadyJoined(connection_id)
            }
        })?;

        Ok(room.clone())
    }

    async fn leave_by_connection(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<DepartedRoom> {
        let mut rooms = self.rooms.lock().await;

        // 接続は高々 1 つのルームに属するため、最初に見つかったルームで
        // 走査を打ち切る
        for (room_id, room) in rooms.iter_mut() {
            if room.remove_participant(connection_id, now).is_some() {
                return Some(DepartedRoom {
                    room_id: room_id.clone(),
                    remaining_users: room.users.clone(),
                });
            }
        }

        None
    }

    async fn update_file_content(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        content: String,
    ) -> EditOutcome {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                if room.update_file_content(file_id, content) {
                    EditOutcome::Applied
                } else {
                    EditOutcome::FileNotFound
                }
            }
            None => EditOutcome::RoomNotFound,
        }
    }

    async fn update_file_language(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        language: String,
    ) -> EditOutcome {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                if room.update_file_language(file_id, language) {
                    EditOutcome::Applied
                } else {
                    EditOutcome::FileNotFound
                }
            }
            None => EditOutcome::RoomNotFound,
        }
    }

    async fn replace_notes(&self, room_id: &RoomId, notes: String) -> EditOutcome {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                room.replace_notes(notes);
                EditOutcome::Applied
            }
            None => EditOutcome::RoomNotFound,
        }
    }

    async fn replace_files(&self, room_id: &RoomId, files: Vec<RoomFile>) -> EditOutcome {
        let mut rooms = self.rooms.lock().await;
        match rooms.get_mut(room_id) {
            Some(room) => {
                room.replace_files(files);
                EditOutcome::Applied
            }
            None => EditOutcome::RoomNotFound,
        }
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        rooms.values().cloned().collect()
    }

    async fn connection_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|room| {
                room.users
                    .iter()
                    .map(|p| p.connection_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn remove_rooms_idle_since(&self, cutoff: Timestamp) -> Vec<RoomId> {
        let mut rooms = self.rooms.lock().await;
        let expired: Vec<RoomId> = rooms
            .iter()
            .filter(|(_, room)| {
                room.is_empty() && room.emptied_at.is_some_and(|emptied| emptied <= cutoff)
            })
            .map(|(room_id, _)| room_id.clone())
            .collect();
        for room_id in &expired {
            rooms.remove(room_id);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の基本的なレジストリ操作
    // - ルームの遅延生成と参加者の追加・削除
    // - 変更操作の EditOutcome（Applied / RoomNotFound / FileNotFound）
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれるデータアクセス層の中核
    // - 「ルームは Join でのみ生成される」という不変条件を保証する必要がある
    // - UseCase 層が Repository に依存できるよう、信頼性を担保する
    //
    // 【どのようなシナリオをテストするか】
    // 1. 参加によるルーム生成と再利用
    // 2. 退出時の最初のマッチでの走査打ち切り
    // 3. 変更操作の成功・失敗ケース
    // 4. アイドルルームの削除
    // ========================================

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn connection_id(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn participant(user_id: &str, conn: &str) -> Participant {
        Participant::new(
            UserId::new(user_id.to_string()).unwrap(),
            user_id.to_string(),
            connection_id(conn),
            Timestamp::new(1000),
        )
    }

    #[tokio::test]
    async fn test_join_room_creates_room_once() {
        // テスト項目: ルームは最初の参加でのみ生成され、以降は再利用される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let first = repo
            .join_room(
                room_id("r1"),
                participant("alice", "conn-1"),
                RoomFile::initial("python"),
                Timestamp::new(1000),
            )
            .await
            .unwrap();
        let second = repo
            .join_room(
                room_id("r1"),
                participant("bob", "conn-2"),
                RoomFile::initial("javascript"),
                Timestamp::new(2000),
            )
            .await
            .unwrap();

        // then (期待する結果): 2 回目の default_file と created_at は無視される
        assert_eq!(first.created_at, Timestamp::new(1000));
        assert_eq!(second.created_at, Timestamp::new(1000));
        assert_eq!(second.files[0].name, "Solution.py");
        assert_eq!(second.users.len(), 2);
    }

    #[tokio::test]
    async fn test_join_room_rejects_connection_in_another_room() {
        // テスト項目: 別ルームに参加済みの接続は拒否される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.join_room(
            room_id("r1"),
            participant("alice", "conn-1"),
            RoomFile::initial("python"),
            Timestamp::new(1000),
        )
        .await
        .unwrap();

        // when (操作):
        let result = repo
            .join_room(
                room_id("r2"),
                participant("alice", "conn-1"),
                RoomFile::initial("python"),
                Timestamp::new(2000),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            RepositoryError::AlreadyJoined("conn-1".to_string())
        );
        assert!(repo.get_room(&room_id("r2")).await.is_none());
    }

    #[tokio::test]
    async fn test_leave_by_connection_removes_from_owning_room() {
        // テスト項目: 退出で接続の属するルームからのみ参加者が削除される
        // given (前提条件): 2 つのルームにそれぞれ参加者がいる
        let repo = InMemoryRoomRepository::new();
        repo.join_room(
            room_id("r1"),
            participant("alice", "conn-1"),
            RoomFile::initial("python"),
            Timestamp::new(1000),
        )
        .await
        .unwrap();
        repo.join_room(
            room_id("r2"),
            participant("bob", "conn-2"),
            RoomFile::initial("python"),
            Timestamp::new(1000),
        )
        .await
        .unwrap();

        // when (操作):
        let departed = repo
            .leave_by_connection(&connection_id("conn-1"), Timestamp::new(2000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(departed.room_id, room_id("r1"));
        assert!(departed.remaining_users.is_empty());
        let other = repo.get_room(&room_id("r2")).await.unwrap();
        assert_eq!(other.users.len(), 1);
    }

    #[tokio::test]
    async fn test_leave_by_unknown_connection() {
        // テスト項目: どのルームにも属さない接続の退出は None を返す
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let departed = repo
            .leave_by_connection(&connection_id("conn-9"), Timestamp::new(2000))
            .await;

        // then (期待する結果):
        assert!(departed.is_none());
    }

    #[tokio::test]
    async fn test_update_file_content_outcomes() {
        // テスト項目: ファイル内容更新が Applied / RoomNotFound / FileNotFound を正しく返す
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.join_room(
            room_id("r1"),
            participant("alice", "conn-1"),
            RoomFile::initial("python"),
            Timestamp::new(1000),
        )
        .await
        .unwrap();

        // when / then (操作と期待する結果):
        assert_eq!(
            repo.update_file_content(&room_id("r1"), FileId::new(1), "x".to_string())
                .await,
            EditOutcome::Applied
        );
        assert_eq!(
            repo.update_file_content(&room_id("r1"), FileId::new(9), "x".to_string())
                .await,
            EditOutcome::FileNotFound
        );
        assert_eq!(
            repo.update_file_content(&room_id("nope"), FileId::new(1), "x".to_string())
                .await,
            EditOutcome::RoomNotFound
        );
    }

    #[tokio::test]
    async fn test_replace_notes_unknown_room() {
        // テスト項目: 存在しないルームへのノート更新は RoomNotFound になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let outcome = repo
            .replace_notes(&room_id("nope"), "notes".to_string())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, EditOutcome::RoomNotFound);
    }

    #[tokio::test]
    async fn test_connection_ids_unknown_room_is_empty() {
        // テスト項目: 存在しないルームの接続 ID 一覧は空になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let ids = repo.connection_ids(&room_id("nope")).await;

        // then (期待する結果):
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_remove_rooms_idle_since() {
        // テスト項目: カットオフ以前に空になったルームだけが削除される
        // given (前提条件): r1 は t=1000 に、r2 は t=9000 に空になった
        let repo = InMemoryRoomRepository::new();
        for (room, conn, left_at) in [("r1", "conn-1", 1000), ("r2", "conn-2", 9000)] {
            repo.join_room(
                room_id(room),
                participant("alice", conn),
                RoomFile::initial("python"),
                Timestamp::new(500),
            )
            .await
            .unwrap();
            repo.leave_by_connection(&connection_id(conn), Timestamp::new(left_at))
                .await
                .unwrap();
        }

        // when (操作):
        let removed = repo.remove_rooms_idle_since(Timestamp::new(5000)).await;

        // then (期待する結果):
        assert_eq!(removed, vec![room_id("r1")]);
        assert!(repo.get_room(&room_id("r1")).await.is_none());
        assert!(repo.get_room(&room_id("r2")).await.is_some());
    }
}
