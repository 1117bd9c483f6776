//! Infrastructure layer: wire DTOs, the WebSocket event pusher and the
//! in-memory session repository.

pub mod dto;
pub mod event_pusher;
pub mod repository;
