//! UseCase error types.
//!
//! Per-event failures stay contained to that event's handling: callers
//! log these and keep the connection open. Nothing here propagates into
//! process-level crash handling.

use thiserror::Error;

use crate::domain::EventPushError;

/// Errors surfaced while routing an inbound event.
#[derive(Debug, Error)]
pub enum RouteEventError {
    #[error("failed to serialize outbound event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to broadcast event: {0}")]
    Broadcast(#[from] EventPushError),
}

/// Errors surfaced while announcing presence changes.
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("failed to serialize presence event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to push presence event: {0}")]
    Push(#[from] EventPushError),
}
