//! CLI client for Dojo collaborative code editing rooms.
//!
//! Joins a room, prints live updates from the other participants, and
//! turns input lines into edit events. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval); authentication
//! rejections exit immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dojo-client -- --room r1 --user-id alice --api-key master-key
//! cargo run --bin dojo-client -- --room r1 --user-id alice --token <jwt>
//! ```

use clap::Parser;

use dojo_client::{ClientConfig, run_client};
use dojo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "dojo-client")]
#[command(about = "CLI client for collaborative code editing rooms", long_about = None)]
struct Args {
    /// Room to join (created on first join)
    #[arg(short = 'r', long)]
    room: String,

    /// User id for identifying edits
    #[arg(short = 'U', long)]
    user_id: String,

    /// Display name shown to other participants (defaults to the user id)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Language of the room's default file
    #[arg(short = 'l', long, default_value = "python")]
    language: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// API key (sent as x-api-key header and user_api_key cookie)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Bearer token issued by the identity service
    #[arg(short = 't', long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        room_id: args.room,
        display_name: args.name.unwrap_or_else(|| args.user_id.clone()),
        user_id: args.user_id,
        language: args.language,
        api_key: args.api_key,
        token: args.token,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
