//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::Room,
    infrastructure::dto::http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};
use dojo_shared::time::timestamp_to_jst_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries: Vec<RoomSummaryDto> = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            participants: room
                .users
                .iter()
                .map(|p| p.user_id.as_str().to_string())
                .collect(),
            file_count: room.files.len(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => {
            // Domain Model から DTO への変換
            let room_detail = RoomDetailDto {
                id: room.id.as_str().to_string(),
                participants: room
                    .users
                    .iter()
                    .map(|p| ParticipantDetailDto {
                        user_id: p.user_id.as_str().to_string(),
                        display_name: p.display_name.clone(),
                        connection_id: p.connection_id.as_str().to_string(),
                        joined_at: timestamp_to_jst_rfc3339(p.joined_at.value()),
                    })
                    .collect(),
                files: room.files.into_iter().map(Into::into).collect(),
                notes: room.notes,
                created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            };
            Ok(Json(room_detail))
        }
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}

/// Debug endpoint to get raw room state (for testing purposes)
pub async fn debug_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<Room>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms)
}
