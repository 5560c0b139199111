//! Shared utilities for the Dojo collaborative editing application.
//!
//! This crate holds the pieces that both the server and the CLI client
//! need: logging setup and time handling.

pub mod logger;
pub mod time;
