//! Collaborative code editing session server.
//!
//! Clients join named rooms over WebSocket and edits (code, language,
//! notes, files, cursors) are propagated live to every other participant.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=secret cargo run --bin dojo-server
//! JWT_SECRET=secret MASTER_API_KEY=master cargo run --bin dojo-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use chrono::Duration;
use clap::Parser;

use dojo_server::{
    infrastructure::{
        auth::JwtTokenVerifier, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::Server,
    usecase::{
        AuthenticateConnectionUseCase, EditRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, ReapIdleRoomsUseCase,
        reap_idle_rooms::DEFAULT_GRACE_SECS,
    },
};
use dojo_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "dojo-server")]
#[command(about = "Real-time collaborative code editing session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Grace period in seconds before an empty room is reaped
    #[arg(long, default_value_t = DEFAULT_GRACE_SECS)]
    room_grace_secs: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), "debug");

    let args = Args::parse();

    // Environment configuration: the JWT secret is shared with the
    // identity service that issues the tokens; the master API key enables
    // the service-to-service bypass when set.
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set, using development default");
        "dev-secret-change-in-production".to_string()
    });
    let master_api_key = std::env::var("MASTER_API_KEY").ok();
    if master_api_key.is_none() {
        tracing::info!("MASTER_API_KEY not set, service-to-service bypass disabled");
    }

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. TokenVerifier
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create TokenVerifier (JWT implementation)
    let token_verifier = Arc::new(JwtTokenVerifier::new(jwt_secret));

    // 4. Create UseCases
    let authenticate_connection_usecase = Arc::new(AuthenticateConnectionUseCase::new(
        token_verifier,
        master_api_key,
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let edit_room_usecase = Arc::new(EditRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));
    let reap_idle_rooms_usecase = Arc::new(ReapIdleRoomsUseCase::new(
        repository.clone(),
        Arc::new(SystemClock),
        Duration::seconds(args.room_grace_secs),
    ));

    // 5. Create and run the server
    let server = Server::new(
        authenticate_connection_usecase,
        join_room_usecase,
        leave_room_usecase,
        edit_room_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        reap_idle_rooms_usecase,
        message_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
