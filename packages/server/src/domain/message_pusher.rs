//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのメッセージ送信（通知）のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Channel used to push serialized messages to one connection
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Errors surfaced when pushing messages to connections
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// The connection is not registered
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    /// The push failed (receiver dropped)
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、WebSocket などの具体的な通知手段には
/// 依存しない。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a live connection's outbound channel
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Unregister a connection's outbound channel
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Push a message to a single connection
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push a message to every target connection.
    ///
    /// Individual send failures are tolerated; a dead receiver must not
    /// abort delivery to the remaining targets.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
