//! Data Transfer Objects (DTOs) for the room broadcast service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: event envelopes exchanged over the WebSocket
//! - `http`: HTTP API response DTOs

pub mod http;
pub mod websocket;
