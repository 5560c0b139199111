//! Error types for the collaborative editing client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the connection handshake (401/403).
    /// Retrying with the same credentials cannot succeed.
    #[error("Connection rejected by server: {0}")]
    Rejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
