//! HTTP API response DTOs for the collaborative session server.

use serde::{Deserialize, Serialize};

use super::websocket::FileDto;

/// Summary of one room for the room list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// User ids of the current participants, in join order
    pub participants: Vec<String>,
    pub file_count: usize,
    /// Creation time, RFC 3339 in JST
    pub created_at: String,
}

/// Participant detail for the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub user_id: String,
    pub display_name: String,
    pub connection_id: String,
    /// Join time, RFC 3339 in JST
    pub joined_at: String,
}

/// Full detail of one room for the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub files: Vec<FileDto>,
    pub notes: String,
    /// Creation time, RFC 3339 in JST
    pub created_at: String,
}
