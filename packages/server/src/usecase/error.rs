//! UseCase 層のエラー定義

use thiserror::Error;

/// Connection-level authentication errors.
///
/// These are the only errors propagated to the caller; they terminate the
/// connection handshake before any session state is created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Neither a bearer token nor an API key was presented
    #[error("unauthorized: token or API key required")]
    Unauthorized,

    /// An API key was presented but does not match the cookie-stored key
    #[error("forbidden: invalid API key")]
    Forbidden,

    /// The bearer token failed verification (bad signature, expired,
    /// or missing when required)
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors surfaced when joining a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The connection is already a member of a room
    #[error("connection '{0}' has already joined a room")]
    AlreadyJoined(String),
}

/// Errors surfaced when fetching a single room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GetRoomDetailError {
    /// No room exists under the requested id
    #[error("room not found")]
    RoomNotFound,
}
