//! Event delivery implementations.
//!
//! Concrete implementations of the `EventPusher` trait. Currently only
//! the WebSocket-backed pusher exists.

pub mod websocket;

pub use websocket::WebSocketEventPusher;
