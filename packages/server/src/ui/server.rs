//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::MessagePusher;
use crate::usecase::{
    AuthenticateConnectionUseCase, EditRoomUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    JoinRoomUseCase, LeaveRoomUseCase, ReapIdleRoomsUseCase,
    reap_idle_rooms::DEFAULT_SWEEP_INTERVAL_SECS,
};

use super::{
    handler::{
        http::{debug_rooms, get_room_detail, get_rooms, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket collaborative session server
///
/// This struct encapsulates the server configuration and provides methods
/// to run the server.
pub struct Server {
    /// AuthenticateConnectionUseCase（接続認証のユースケース）
    authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// EditRoomUseCase（ルーム編集のユースケース）
    edit_room_usecase: Arc<EditRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// ReapIdleRoomsUseCase（アイドルルーム回収のユースケース）
    reap_idle_rooms_usecase: Arc<ReapIdleRoomsUseCase>,
    /// MessagePusher（接続ライフサイクル管理に使用）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        authenticate_connection_usecase: Arc<AuthenticateConnectionUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        edit_room_usecase: Arc<EditRoomUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        reap_idle_rooms_usecase: Arc<ReapIdleRoomsUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            authenticate_connection_usecase,
            join_room_usecase,
            leave_room_usecase,
            edit_room_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
            reap_idle_rooms_usecase,
            message_pusher,
        }
    }

    /// Run the collaborative session server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            authenticate_connection_usecase: self.authenticate_connection_usecase,
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            edit_room_usecase: self.edit_room_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            message_pusher: self.message_pusher,
        });

        // アイドルルーム回収の定期タスク（Leave とは独立したポリシー）
        let reaper = self.reap_idle_rooms_usecase;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                reaper.execute().await;
            }
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/debug/rooms", get(debug_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Collaborative session server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
