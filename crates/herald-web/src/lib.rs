//! Herald Web Server
//!
//! Axum-based HTTP API and WebSocket push channel.

pub mod routes;
pub mod state;
pub mod websocket;

use axum::{routing::get, Router};
use herald_core::HeraldConfig;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification),
        )
        .route("/notifications/{id}", get(routes::notifications::get_notification))
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(notification_routes())
        // Legacy v1 prefix
        .nest("/api/v1", notification_routes())
        .route("/live", get(websocket::ws_handler))
        .route("/ws", get(websocket::ws_handler))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(config: HeraldConfig) -> anyhow::Result<()> {
    config.validate()?;
    let state = AppState::new(config.hub.clone());
    let hub = Arc::clone(&state.hub);
    let app = create_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        queue_capacity = config.hub.queue_capacity,
        write_timeout_ms = config.hub.write_timeout_ms,
        "Web server listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
            hub.shutdown();
        })
        .await?;

    Ok(())
}
