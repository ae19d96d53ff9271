use std::future::Future;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{ask_handler, delete_history_handler, health_handler, history_handler};
use crate::state::AppState;

pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/ask", post(ask_handler))
        .route("/history", get(history_handler))
        .route("/history/{index}", delete(delete_history_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http());

    let app = if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    app.with_state(state)
}

pub async fn run_server(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
