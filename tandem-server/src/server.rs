use crate::config::ServerConfig;
use crate::room::Room;
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::{Router, routing::get};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Spawns the room actor and returns the service that feeds it.
pub fn spawn_room(config: &ServerConfig) -> SignalingService {
    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let service = SignalingService::new(cmd_tx);

    let room = Room::new(cmd_rx, Arc::new(service.clone()));
    tokio::spawn(room.run());

    service
}

pub fn router(service: SignalingService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .route("/room", get(room_status))
        .layer(cors)
        .with_state(service)
}

async fn room_status(State(service): State<SignalingService>) -> impl IntoResponse {
    match service.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => {
            error!("Room snapshot failed: {:#}", e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Serves until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(listener: TcpListener, config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = spawn_room(&config);
    let app = router(service.clone());

    // Upgraded sockets outlive the HTTP connection; close them explicitly.
    let shutdown = async move {
        shutdown.await;
        info!("Closing open signaling connections");
        service.close_all();
    };

    info!(
        "Signaling server listening on ws://{}",
        listener.local_addr().context("listener has no local address")?
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("signaling server failed")
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    serve_with_shutdown(listener, config, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown requested");
    })
    .await
}
