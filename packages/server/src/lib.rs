//! Real-time collaborative code editing session server.
//!
//! This library implements the session layer that lets multiple clients
//! jointly edit a shared set of code files, notes, and cursors inside a
//! named room, with live propagation of changes to every other
//! participant over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
