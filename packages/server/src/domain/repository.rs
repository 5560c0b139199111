//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    EditOutcome, Participant, RepositoryError, Room, RoomFile,
    value_object::{ConnectionId, FileId, RoomId, Timestamp},
};

/// Result of removing a departed connection from its room
#[derive(Debug, Clone)]
pub struct DepartedRoom {
    /// The room the connection was a member of
    pub room_id: RoomId,
    /// The membership list after removal
    pub remaining_users: Vec<Participant>,
}

/// Room Repository trait
///
/// ドメイン層が必要とするルームレジストリへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
/// 依存しない。
///
/// 各メソッドはひとつのロック取得の中で完結し、ルームに対する変更は
/// 到着順に直列化されます。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Add a participant to a room, creating the room with the given
    /// default file when absent.
    ///
    /// Returns a snapshot of the room after the join.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::AlreadyJoined` if the connection is a
    /// member of any room (one room per connection).
    async fn join_room(
        &self,
        room_id: RoomId,
        participant: Participant,
        default_file: RoomFile,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// Remove the participant held by the given connection from the first
    /// room that contains it. Returns the room id and the remaining
    /// membership, or `None` if no room contains the connection.
    async fn leave_by_connection(
        &self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<DepartedRoom>;

    /// Overwrite a file's content wholesale (last write wins)
    async fn update_file_content(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        content: String,
    ) -> EditOutcome;

    /// Overwrite a file's language tag (file name untouched)
    async fn update_file_language(
        &self,
        room_id: &RoomId,
        file_id: FileId,
        language: String,
    ) -> EditOutcome;

    /// Replace the room's shared notes wholesale
    async fn replace_notes(&self, room_id: &RoomId, notes: String) -> EditOutcome;

    /// Replace the room's entire file sequence wholesale
    async fn replace_files(&self, room_id: &RoomId, files: Vec<RoomFile>) -> EditOutcome;

    /// Get a snapshot of a room
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// Get snapshots of all rooms
    async fn list_rooms(&self) -> Vec<Room>;

    /// Get the connection ids of every participant in a room.
    ///
    /// An unknown room yields an empty list.
    async fn connection_ids(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// Remove every room that has had zero participants since before the
    /// cutoff. Returns the removed room ids.
    async fn remove_rooms_idle_since(&self, cutoff: Timestamp) -> Vec<RoomId>;
}
