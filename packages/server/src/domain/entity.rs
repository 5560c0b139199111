//! Core domain models for collaborative editing rooms.

use serde::{Deserialize, Serialize};

use super::{
    error::RoomError,
    extension::default_file_name,
    value_object::{ConnectionId, FileId, RoomId, Timestamp, UserId},
};

/// Id of the file a room is lazily created with
pub const DEFAULT_FILE_ID: u32 = 1;

/// Typed result of a room mutation.
///
/// The wire protocol stays silent on misses (stale client references are
/// expected during wholesale file replacement), but callers and tests can
/// observe which case occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The mutation was applied to room state
    Applied,
    /// The target room does not exist
    RoomNotFound,
    /// The room exists but the target file does not
    FileNotFound,
}

impl EditOutcome {
    /// Whether the mutation changed room state (and should be broadcast)
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Represents a collaborative editing room with participants, shared code
/// files and shared notes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier (caller-chosen key)
    pub id: RoomId,
    /// Participants currently in the room, in join order
    pub users: Vec<Participant>,
    /// Shared code files, unique id within the room
    pub files: Vec<RoomFile>,
    /// Shared notes, whole-value replace semantics
    pub notes: String,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Timestamp when the last participant left, if the room is empty.
    /// Consumed by the idle-room reaper; cleared on join.
    pub emptied_at: Option<Timestamp>,
}

impl Room {
    /// Create a new room holding the given default file, no participants
    /// and empty notes
    pub fn new(id: RoomId, default_file: RoomFile, created_at: Timestamp) -> Self {
        Self {
            id,
            users: Vec::new(),
            files: vec![default_file],
            notes: String::new(),
            created_at,
            emptied_at: None,
        }
    }

    /// Add a participant to the room
    ///
    /// # Errors
    ///
    /// Returns `RoomError::DuplicateConnection` if the connection already
    /// holds a participant entry in this room
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), RoomError> {
        if self.has_connection(&participant.connection_id) {
            return Err(RoomError::DuplicateConnection {
                connection_id: participant.connection_id.as_str().to_string(),
            });
        }
        self.users.push(participant);
        self.emptied_at = None;
        Ok(())
    }

    /// Remove the participant held by the given connection.
    ///
    /// Stamps `emptied_at` when the last participant leaves.
    pub fn remove_participant(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<Participant> {
        let index = self
            .users
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        let removed = self.users.remove(index);
        if self.users.is_empty() {
            self.emptied_at = Some(now);
        }
        Some(removed)
    }

    /// Whether the given connection holds a participant entry in this room
    pub fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.users.iter().any(|p| &p.connection_id == connection_id)
    }

    /// Whether the room has no participants
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Get a file by id
    pub fn find_file(&self, file_id: FileId) -> Option<&RoomFile> {
        self.files.iter().find(|f| f.id == file_id)
    }

    /// Overwrite a file's content wholesale. Last write wins.
    ///
    /// Returns `false` if the file does not exist.
    pub fn update_file_content(&mut self, file_id: FileId, content: String) -> bool {
        match self.files.iter_mut().find(|f| f.id == file_id) {
            Some(file) => {
                file.content = content;
                true
            }
            None => false,
        }
    }

    /// Overwrite a file's language tag. The file name keeps its original
    /// extension.
    ///
    /// Returns `false` if the file does not exist.
    pub fn update_file_language(&mut self, file_id: FileId, language: String) -> bool {
        match self.files.iter_mut().find(|f| f.id == file_id) {
            Some(file) => {
                file.language = language;
                true
            }
            None => false,
        }
    }

    /// Replace the shared notes wholesale. Last write wins.
    pub fn replace_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    /// Replace the entire file sequence wholesale. Last submission wins;
    /// file ids are the client's responsibility from here on.
    pub fn replace_files(&mut self, files: Vec<RoomFile>) {
        self.files = files;
    }
}

/// One live connection's membership record within a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Client-supplied user identity
    pub user_id: UserId,
    /// Client-supplied display name (drives UI ordering, not correctness)
    pub display_name: String,
    /// Server-assigned connection identity, the departure lookup key
    pub connection_id: ConnectionId,
    /// Timestamp when the participant joined the room
    pub joined_at: Timestamp,
}

impl Participant {
    /// Create a new Participant
    pub fn new(
        user_id: UserId,
        display_name: String,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            display_name,
            connection_id,
            joined_at,
        }
    }
}

/// A shared code file within a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFile {
    /// File identifier, unique within the room
    pub id: FileId,
    /// File name shown to clients
    pub name: String,
    /// Language tag (editor highlighting hint)
    pub language: String,
    /// Whole file content
    pub content: String,
}

impl RoomFile {
    /// Create a new RoomFile
    pub fn new(id: FileId, name: String, language: String, content: String) -> Self {
        Self {
            id,
            name,
            language,
            content,
        }
    }

    /// The default file a room is lazily created with: `Solution.<ext>`
    /// for the requested language, empty content
    pub fn initial(language: &str) -> Self {
        Self {
            id: FileId::new(DEFAULT_FILE_ID),
            name: default_file_name(language),
            language: language.to_string(),
            content: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_participant(user_id: &str, connection_id: &str) -> Participant {
        Participant::new(
            UserId::new(user_id.to_string()).unwrap(),
            user_id.to_string(),
            ConnectionId::new(connection_id.to_string()).unwrap(),
            Timestamp::new(1000),
        )
    }

    fn test_room(room_id: &str, language: &str) -> Room {
        Room::new(
            RoomId::new(room_id.to_string()).unwrap(),
            RoomFile::initial(language),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_new_room_has_default_file() {
        // テスト項目: 新規ルームはデフォルトファイル 1 つと空のノートを持つ
        // when (操作):
        let room = test_room("r1", "python");

        // then (期待する結果):
        assert_eq!(room.files.len(), 1);
        assert_eq!(room.files[0].id, FileId::new(DEFAULT_FILE_ID));
        assert_eq!(room.files[0].name, "Solution.py");
        assert_eq!(room.files[0].content, "");
        assert_eq!(room.notes, "");
        assert!(room.users.is_empty());
    }

    #[test]
    fn test_add_participant_success() {
        // テスト項目: 参加者を追加すると users に追加順で反映される
        // given (前提条件):
        let mut room = test_room("r1", "python");

        // when (操作):
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();
        room.add_participant(test_participant("bob", "conn-2"))
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.users.len(), 2);
        assert_eq!(room.users[0].user_id.as_str(), "alice");
        assert_eq!(room.users[1].user_id.as_str(), "bob");
    }

    #[test]
    fn test_add_participant_same_user_different_connections() {
        // テスト項目: 同じユーザー ID でも接続 ID が異なれば別の参加者として追加される
        // given (前提条件):
        let mut room = test_room("r1", "python");

        // when (操作):
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();
        room.add_participant(test_participant("alice", "conn-2"))
            .unwrap();

        // then (期待する結果): マルチタブ参加が許容される
        assert_eq!(room.users.len(), 2);
    }

    #[test]
    fn test_add_participant_duplicate_connection() {
        // テスト項目: 同じ接続 ID での二重参加はエラーになる
        // given (前提条件):
        let mut room = test_room("r1", "python");
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();

        // when (操作):
        let result = room.add_participant(test_participant("alice", "conn-1"));

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            RoomError::DuplicateConnection { .. }
        ));
        assert_eq!(room.users.len(), 1);
    }

    #[test]
    fn test_remove_participant_stamps_emptied_at() {
        // テスト項目: 最後の参加者が退出すると emptied_at が記録される
        // given (前提条件):
        let mut room = test_room("r1", "python");
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();

        // when (操作):
        let removed = room.remove_participant(
            &ConnectionId::new("conn-1".to_string()).unwrap(),
            Timestamp::new(5000),
        );

        // then (期待する結果):
        assert!(removed.is_some());
        assert!(room.is_empty());
        assert_eq!(room.emptied_at, Some(Timestamp::new(5000)));
    }

    #[test]
    fn test_rejoin_clears_emptied_at() {
        // テスト項目: 空になったルームに再参加すると emptied_at がクリアされる
        // given (前提条件):
        let mut room = test_room("r1", "python");
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();
        room.remove_participant(
            &ConnectionId::new("conn-1".to_string()).unwrap(),
            Timestamp::new(5000),
        );

        // when (操作):
        room.add_participant(test_participant("bob", "conn-2"))
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.emptied_at, None);
    }

    #[test]
    fn test_remove_unknown_connection_is_noop() {
        // テスト項目: 存在しない接続の削除は何もしない
        // given (前提条件):
        let mut room = test_room("r1", "python");
        room.add_participant(test_participant("alice", "conn-1"))
            .unwrap();

        // when (操作):
        let removed = room.remove_participant(
            &ConnectionId::new("conn-9".to_string()).unwrap(),
            Timestamp::new(5000),
        );

        // then (期待する結果):
        assert!(removed.is_none());
        assert_eq!(room.users.len(), 1);
        assert_eq!(room.emptied_at, None);
    }

    #[test]
    fn test_update_file_content_last_write_wins() {
        // テスト項目: 同じファイルへの連続更新は後勝ちになる
        // given (前提条件):
        let mut room = test_room("r1", "python");
        let file_id = FileId::new(DEFAULT_FILE_ID);

        // when (操作):
        assert!(room.update_file_content(file_id, "print(1)".to_string()));
        assert!(room.update_file_content(file_id, "print(2)".to_string()));

        // then (期待する結果):
        assert_eq!(room.find_file(file_id).unwrap().content, "print(2)");
    }

    #[test]
    fn test_update_file_content_unknown_file() {
        // テスト項目: 存在しないファイルの更新は false を返し状態を変えない
        // given (前提条件):
        let mut room = test_room("r1", "python");

        // when (操作):
        let applied = room.update_file_content(FileId::new(42), "x".to_string());

        // then (期待する結果):
        assert!(!applied);
        assert_eq!(
            room.find_file(FileId::new(DEFAULT_FILE_ID)).unwrap().content,
            ""
        );
    }

    #[test]
    fn test_update_file_language_keeps_name() {
        // テスト項目: 言語を変更してもファイル名は再生成されない
        // given (前提条件):
        let mut room = test_room("r1", "python");
        let file_id = FileId::new(DEFAULT_FILE_ID);

        // when (操作):
        assert!(room.update_file_language(file_id, "javascript".to_string()));

        // then (期待する結果):
        let file = room.find_file(file_id).unwrap();
        assert_eq!(file.language, "javascript");
        assert_eq!(file.name, "Solution.py");
    }

    #[test]
    fn test_replace_files_is_wholesale() {
        // テスト項目: ファイル一覧の置き換えは全置換になる
        // given (前提条件):
        let mut room = test_room("r1", "python");

        // when (操作):
        room.replace_files(vec![
            RoomFile::new(
                FileId::new(2),
                "util.py".to_string(),
                "python".to_string(),
                "def f(): pass".to_string(),
            ),
            RoomFile::new(
                FileId::new(3),
                "main.py".to_string(),
                "python".to_string(),
                String::new(),
            ),
        ]);

        // then (期待する結果): デフォルトファイルは残らない
        assert_eq!(room.files.len(), 2);
        assert!(room.find_file(FileId::new(DEFAULT_FILE_ID)).is_none());
        assert!(room.find_file(FileId::new(2)).is_some());
    }

    #[test]
    fn test_replace_notes_is_wholesale() {
        // テスト項目: ノートの更新は全置換になる
        // given (前提条件):
        let mut room = test_room("r1", "python");
        room.replace_notes("first".to_string());

        // when (操作):
        room.replace_notes("second".to_string());

        // then (期待する結果):
        assert_eq!(room.notes, "second");
    }
}
