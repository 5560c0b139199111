//! WebSocket connection handlers.
//!
//! One connection's lifecycle: credential extraction → Connection Gate →
//! connection id assignment → channel registration → upgrade. After the
//! upgrade, inbound events are dispatched to the matching use case and
//! the resulting broadcasts flow back out through the per-connection
//! channels. Disconnect (either direction closing) is the sole cleanup
//! path for room membership.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, FileId, RoomId, UserId},
    infrastructure::dto::websocket::{
        CodeUpdateMessage, CursorUpdateMessage, EventEnvelope, FileUpdateMessage, JoinRoomMessage,
        LanguageUpdateMessage, MessageType, NotesUpdateMessage, SERVER_USER_ID,
        UsersUpdateMessage,
    },
    ui::state::AppState,
    usecase::{AuthError, ConnectionCredentials, JoinError},
};

/// Name of the cookie holding the caller's API key
const API_KEY_COOKIE: &str = "user_api_key";

/// Name of the header holding the caller's API key
const API_KEY_HEADER: &str = "x-api-key";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    // Connection Gate: a rejected connection never reaches the event loop
    let credentials = extract_credentials(&headers);
    let auth = state
        .authenticate_connection_usecase
        .execute(&credentials)
        .map_err(|e| {
            tracing::warn!("Connection rejected: {}", e);
            match e {
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::Unauthorized | AuthError::AuthenticationFailed => {
                    StatusCode::UNAUTHORIZED
                }
            }
        })?;

    let connection_id =
        ConnectionIdFactory::generate().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    // Create a channel for this connection to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_client(connection_id.clone(), tx)
        .await;

    match &auth.user_id {
        Some(user_id) => tracing::info!(
            "Connection '{}' authenticated as user '{}'",
            connection_id.as_str(),
            user_id.as_str()
        ),
        None => tracing::info!(
            "Connection '{}' allowed via master API key",
            connection_id.as_str()
        ),
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
}

/// Pull the credentials the Connection Gate evaluates out of the upgrade
/// request headers.
fn extract_credentials(headers: &HeaderMap) -> ConnectionCredentials {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    let cookie_api_key = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, API_KEY_COOKIE));

    // The API key may arrive via header or cookie; the header wins
    let api_key = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| cookie_api_key.clone());

    ConnectionCredentials {
        token,
        api_key,
        cookie_api_key,
    }
}

/// Extract one cookie's value from a `Cookie` header.
fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Spawns a task that receives messages from the rx channel and pushes
/// them to the WebSocket sender.
///
/// This function handles the outbound message flow: events from other
/// connections (via rx channel) are sent to this connection's WebSocket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this connection
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    route_event(&state_clone, &connection_id_clone, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        connection_id_clone.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Remove the participant from its room and notify the remaining members
    if let Some(departed) = state.leave_room_usecase.execute(&connection_id).await {
        let users_msg = UsersUpdateMessage {
            r#type: MessageType::UsersUpdate,
            users: departed
                .remaining_users
                .into_iter()
                .map(Into::into)
                .collect(),
        };
        let users_json = serde_json::to_string(&users_msg).unwrap();
        if let Err(e) = state
            .leave_room_usecase
            .broadcast_users_update(&departed.room_id, &users_json)
            .await
        {
            tracing::warn!(
                "Failed to broadcast users-update for room '{}': {}",
                departed.room_id.as_str(),
                e
            );
        }
        tracing::info!(
            "Connection '{}' left room '{}'",
            connection_id.as_str(),
            departed.room_id.as_str()
        );
    }

    state.message_pusher.unregister_client(&connection_id).await;
    tracing::info!("Connection '{}' disconnected", connection_id.as_str());
}

/// Dispatch one inbound text frame to the matching use case.
///
/// Malformed payloads and stale references degrade to logged no-ops; the
/// collaborative channel never surfaces data-plane errors to the sender.
async fn route_event(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let envelope: EventEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Failed to parse message as event: {}", e);
            return;
        }
    };

    match envelope.r#type {
        MessageType::JoinRoom => handle_join_room(state, connection_id, text).await,
        MessageType::CodeUpdate => handle_code_update(state, connection_id, text).await,
        MessageType::LanguageUpdate => handle_language_update(state, connection_id, text).await,
        MessageType::NotesUpdate => handle_notes_update(state, connection_id, text).await,
        MessageType::FileUpdate => handle_file_update(state, connection_id, text).await,
        MessageType::CursorUpdate => handle_cursor_update(state, connection_id, text).await,
        MessageType::UsersUpdate => {
            tracing::warn!("Ignoring server-only users-update event from client");
        }
    }
}

async fn handle_join_room(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: JoinRoomMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed join-room payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping join-room with invalid room id");
        return;
    };
    let Ok(user_id) = UserId::new(msg.user.id.clone()) else {
        tracing::warn!("Dropping join-room with invalid user id");
        return;
    };

    match state
        .join_room_usecase
        .execute(
            room_id.clone(),
            user_id,
            msg.user.name.clone(),
            connection_id.clone(),
            &msg.language,
        )
        .await
    {
        Ok(room) => {
            // Broadcast the updated membership to the entire room, joiner included
            let users_msg = UsersUpdateMessage {
                r#type: MessageType::UsersUpdate,
                users: room.users.iter().cloned().map(Into::into).collect(),
            };
            let users_json = serde_json::to_string(&users_msg).unwrap();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_users_update(&room_id, &users_json)
                .await
            {
                tracing::warn!(
                    "Failed to broadcast users-update for room '{}': {}",
                    room_id.as_str(),
                    e
                );
            }

            // Send the current files and notes snapshot to the joiner only
            let files_msg = FileUpdateMessage {
                r#type: MessageType::FileUpdate,
                room_id: room.id.as_str().to_string(),
                files: room.files.iter().cloned().map(Into::into).collect(),
                user_id: msg.user.id.clone(),
            };
            let notes_msg = NotesUpdateMessage {
                r#type: MessageType::NotesUpdate,
                room_id: room.id.as_str().to_string(),
                new_notes: room.notes.clone(),
                user_id: SERVER_USER_ID.to_string(),
            };
            for snapshot in [
                serde_json::to_string(&files_msg).unwrap(),
                serde_json::to_string(&notes_msg).unwrap(),
            ] {
                if let Err(e) = state
                    .join_room_usecase
                    .push_to_joiner(connection_id, &snapshot)
                    .await
                {
                    tracing::warn!(
                        "Failed to push snapshot to '{}': {}",
                        connection_id.as_str(),
                        e
                    );
                }
            }

            tracing::info!(
                "User '{}' joined room '{}' (connection '{}')",
                msg.user.id,
                room_id.as_str(),
                connection_id.as_str()
            );
        }
        Err(JoinError::AlreadyJoined(_)) => {
            tracing::warn!(
                "Connection '{}' attempted to join room '{}' while already in a room",
                connection_id.as_str(),
                room_id.as_str()
            );
        }
    }
}

async fn handle_code_update(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: CodeUpdateMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed code-update payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping code-update with invalid room id");
        return;
    };

    let broadcast_json = serde_json::to_string(&msg).unwrap();
    let outcome = state
        .edit_room_usecase
        .update_code(
            &room_id,
            FileId::new(msg.file_id),
            msg.new_code,
            connection_id,
            &broadcast_json,
        )
        .await;
    if !outcome.is_applied() {
        tracing::debug!(
            "code-update for room '{}' dropped: {:?}",
            room_id.as_str(),
            outcome
        );
    }
}

async fn handle_language_update(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: LanguageUpdateMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed language-update payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping language-update with invalid room id");
        return;
    };

    let broadcast_json = serde_json::to_string(&msg).unwrap();
    let outcome = state
        .edit_room_usecase
        .update_language(
            &room_id,
            FileId::new(msg.file_id),
            msg.new_language,
            connection_id,
            &broadcast_json,
        )
        .await;
    if !outcome.is_applied() {
        tracing::debug!(
            "language-update for room '{}' dropped: {:?}",
            room_id.as_str(),
            outcome
        );
    }
}

async fn handle_notes_update(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: NotesUpdateMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed notes-update payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping notes-update with invalid room id");
        return;
    };

    let broadcast_json = serde_json::to_string(&msg).unwrap();
    let outcome = state
        .edit_room_usecase
        .update_notes(&room_id, msg.new_notes, connection_id, &broadcast_json)
        .await;
    if !outcome.is_applied() {
        tracing::debug!(
            "notes-update for room '{}' dropped: {:?}",
            room_id.as_str(),
            outcome
        );
    }
}

async fn handle_file_update(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: FileUpdateMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed file-update payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping file-update with invalid room id");
        return;
    };

    let broadcast_json = serde_json::to_string(&msg).unwrap();
    let files = msg.files.into_iter().map(Into::into).collect();
    let outcome = state
        .edit_room_usecase
        .replace_files(&room_id, files, connection_id, &broadcast_json)
        .await;
    if !outcome.is_applied() {
        tracing::debug!(
            "file-update for room '{}' dropped: {:?}",
            room_id.as_str(),
            outcome
        );
    }
}

async fn handle_cursor_update(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let msg: CursorUpdateMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::warn!("Malformed cursor-update payload: {}", e);
            return;
        }
    };
    let Ok(room_id) = RoomId::new(msg.room_id.clone()) else {
        tracing::warn!("Dropping cursor-update with invalid room id");
        return;
    };

    // Cursor positions are never stored; pure relay to the rest of the room
    let broadcast_json = serde_json::to_string(&msg).unwrap();
    state
        .edit_room_usecase
        .relay_cursor(&room_id, connection_id, &broadcast_json)
        .await;
}
