//! CLI client for the Dojo collaborative code editing server.
//!
//! Joins a room over WebSocket, prints incoming updates from the other
//! participants, and turns input lines into edit events.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
pub use session::ClientConfig;
