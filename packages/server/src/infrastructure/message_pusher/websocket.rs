//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - 接続へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に
//! 使用します。これにより「WebSocket の生成」と「メッセージの送信」が
//! 分離されます:
//!
//! - UI 層: WebSocket 接続の受付、sender の生成・登録
//! - Infrastructure 層: sender の管理、メッセージ送信

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `connections`: 接続中の接続 ID と対応する WebSocket sender のマップ
pub struct WebSocketMessagePusher {
    /// 接続中の接続の WebSocket sender
    ///
    /// Key: connection_id (String)
    /// Value: PusherChannel
    connections: Mutex<HashMap<String, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id.as_str().to_string(), sender);
        tracing::debug!(
            "Connection '{}' registered to MessagePusher",
            connection_id.as_str()
        );
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id.as_str());
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id.as_str()
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id.as_str()) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(target.as_str()) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push message to connection '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to connection '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}
