//! WebSocket-backed `EventPusher` implementation.
//!
//! Owns the map of connection id to outbound `UnboundedSender`. The
//! WebSocket itself is created in the UI layer
//! (`src/ui/handler/websocket.rs`); this implementation only manages the
//! senders and enqueues envelopes onto them. Sends never await delivery.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPushError, EventPusher, PusherChannel};

/// `EventPusher` over per-connection unbounded mpsc channels.
pub struct WebSocketEventPusher {
    /// Outbound channels of all live connections, across all rooms.
    /// Room isolation is enforced upstream: fan-out target sets are
    /// computed from the per-room registry, never from this map.
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered to pusher", connection_id.as_str());
        connections.insert(connection_id, sender);
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from pusher",
            connection_id.as_str()
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(EventPushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // A broadcast tolerates individual send failures
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push event to connection '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target.as_str());
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

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn connection_id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string())
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にイベントを送信できる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = connection_id("c1");
        pusher.register_connection(conn.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let conn = connection_id("nonexistent");

        // when (操作):
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(EventPushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_targets() {
        // テスト項目: 複数の接続にイベントをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let c1 = connection_id("c1");
        let c2 = connection_id("c2");
        pusher.register_connection(c1.clone(), tx1).await;
        pusher.register_connection(c2.clone(), tx2).await;

        // when (操作):
        let result = pusher.broadcast(vec![c1, c2], "Broadcast event").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast event".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_connection() {
        // テスト項目: ブロードキャスト時、一部の接続が存在しなくても成功する
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let c1 = connection_id("c1");
        pusher.register_connection(c1.clone(), tx1).await;

        // when (操作):
        let targets = vec![c1, connection_id("nonexistent")];
        let result = pusher.broadcast(targets, "Broadcast event").await;

        // then (期待する結果): 部分失敗は許容される
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();

        // when (操作):
        let result = pusher.broadcast(vec![], "Event").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_then_push_fails() {
        // テスト項目: 登録解除後の接続への送信はエラーになる
        // given (前提条件):
        let pusher = WebSocketEventPusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = connection_id("c1");
        pusher.register_connection(conn.clone(), tx).await;

        // when (操作):
        pusher.unregister_connection(&conn).await;
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(EventPushError::ConnectionNotFound(_))
        ));
    }
}
