//! WebSocket collaborative session server implementation.

mod handler;
mod server;
mod signal;
pub mod state; // UseCase 層を束ねた AppState をテストから参照するため public

pub use server::Server;
