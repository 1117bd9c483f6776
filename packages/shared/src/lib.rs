//! Shared utilities for the hiroma room broadcast service.
//!
//! Code used by both the server and client binaries: logging setup and
//! time handling.

pub mod logger;
pub mod time;
