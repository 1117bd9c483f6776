//! Event pusher trait: the seam through which events reach connections.
//!
//! The domain layer defines the interface; the infrastructure layer
//! provides the WebSocket-backed implementation. Delivery is
//! fire-and-forget: a send enqueues onto the connection's outbound
//! channel and never waits for the peer, so a slow or dead connection
//! cannot stall the room.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Outbound channel for one connection, drained by a per-socket pusher task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Errors surfaced by the event pusher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventPushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    #[error("failed to push event: {0}")]
    PushFailed(String),
}

/// Delivery interface for serialized event envelopes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register a connection's outbound channel.
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection's outbound channel. No-op if absent.
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Send an envelope to a single connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), EventPushError>;

    /// Send an envelope to every target connection. Per-connection send
    /// failures are tolerated and logged; the broadcast itself succeeds.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), EventPushError>;
}
