//! WebSocket event DTOs for the collaborative session server.
//!
//! Every event is a JSON text frame with a kebab-case `type` field and
//! snake_case payload fields. Live-edit events (`code-update`,
//! `language-update`, `notes-update`, `file-update`, `cursor-update`)
//! flow in both directions: inbound from the editing client, outbound to
//! every other participant of the room.

use serde::{Deserialize, Serialize};

/// User id attached to server-originated `notes-update` snapshots
pub const SERVER_USER_ID: &str = "server";

/// Event type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    JoinRoom,
    UsersUpdate,
    CodeUpdate,
    LanguageUpdate,
    NotesUpdate,
    FileUpdate,
    CursorUpdate,
}

/// Minimal envelope used to pick the concrete message type before the
/// full payload is parsed
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub r#type: MessageType,
}

/// User identity carried in the join payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
}

/// A shared file as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDto {
    pub id: u32,
    pub name: String,
    pub language: String,
    pub content: String,
}

/// Participant information carried in `users-update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub user_id: String,
    pub display_name: String,
    /// Server-assigned connection id; client UIs key remote cursors by it
    pub connection_id: String,
    /// Unix timestamp (milliseconds since epoch) in JST
    pub joined_at: i64,
}

/// Join request sent by a client right after the connection is upgraded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub user: UserDto,
    pub language: String,
}

/// Membership update broadcast to the entire room (joiner included)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersUpdateMessage {
    pub r#type: MessageType,
    pub users: Vec<ParticipantInfo>,
}

/// Whole-content overwrite of one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeUpdateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub new_code: String,
    pub user_id: String,
    pub file_id: u32,
}

/// Language tag change for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageUpdateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub new_language: String,
    pub user_id: String,
    pub file_id: u32,
}

/// Whole-value replace of the shared notes. Also sent to the joiner as
/// the initial notes snapshot with `user_id` set to [`SERVER_USER_ID`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesUpdateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub new_notes: String,
    pub user_id: String,
}

/// Wholesale replace of the room's file sequence. Also sent to the
/// joiner as the initial files snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpdateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub files: Vec<FileDto>,
    pub user_id: String,
}

/// Ephemeral cursor position relay; `position` is opaque to the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorUpdateMessage {
    pub r#type: MessageType,
    pub room_id: String,
    pub position: serde_json::Value,
    pub user_id: String,
    pub file_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_serializes_kebab_case() {
        // テスト項目: イベント種別が kebab-case でシリアライズされる
        // then (期待する結果):
        assert_eq!(
            serde_json::to_string(&MessageType::JoinRoom).unwrap(),
            "\"join-room\""
        );
        assert_eq!(
            serde_json::to_string(&MessageType::CodeUpdate).unwrap(),
            "\"code-update\""
        );
        assert_eq!(
            serde_json::to_string(&MessageType::CursorUpdate).unwrap(),
            "\"cursor-update\""
        );
    }

    #[test]
    fn test_envelope_parses_type_only() {
        // テスト項目: エンベロープは type フィールドだけで種別を判定できる
        // given (前提条件):
        let raw = r#"{"type":"code-update","room_id":"r1","new_code":"x","user_id":"alice","file_id":1}"#;

        // when (操作):
        let envelope: EventEnvelope = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(envelope.r#type, MessageType::CodeUpdate);
    }

    #[test]
    fn test_join_room_message_roundtrip() {
        // テスト項目: join-room メッセージがワイヤ形式から読み取れる
        // given (前提条件):
        let raw = r#"{
            "type": "join-room",
            "room_id": "r1",
            "user": {"id": "alice", "name": "Alice"},
            "language": "python"
        }"#;

        // when (操作):
        let msg: JoinRoomMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(msg.room_id, "r1");
        assert_eq!(msg.user.id, "alice");
        assert_eq!(msg.language, "python");
    }

    #[test]
    fn test_cursor_position_is_opaque() {
        // テスト項目: カーソル位置は任意の JSON 値として素通しされる
        // given (前提条件):
        let raw = r#"{
            "type": "cursor-update",
            "room_id": "r1",
            "position": {"line": 3, "column": 14},
            "user_id": "alice",
            "file_id": 1
        }"#;

        // when (操作):
        let msg: CursorUpdateMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(msg.position["line"], 3);
        assert_eq!(msg.position["column"], 14);
    }

    #[test]
    fn test_unknown_event_type_fails_to_parse() {
        // テスト項目: 未知のイベント種別はパースエラーになる
        // given (前提条件):
        let raw = r#"{"type":"shutdown-server"}"#;

        // when (操作):
        let result = serde_json::from_str::<EventEnvelope>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
