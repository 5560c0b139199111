//! Infrastructure layer for the collaborative session server.
//!
//! Concrete implementations of the interfaces the domain layer defines:
//! - `repository`: in-memory room registry
//! - `message_pusher`: WebSocket message delivery
//! - `auth`: JWT credential verification
//! - `dto`: wire formats (WebSocket events, HTTP responses)

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod repository;
