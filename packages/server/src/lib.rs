//! Room broadcast server for the hiroma chat application.
//!
//! One broadcast session per room: a connection registry tracks joined
//! participants, typed events are routed to the correct fan-out, and
//! presence changes are announced to the room. Message history, accounts
//! and authentication live outside this layer.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
