//! CLI room client for the Hiroma broadcast server.

pub mod adapter;
pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
