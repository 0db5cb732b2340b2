//! HTTP server assembly.

use crate::admin::{routes, AdminState};
use anyhow::{Context, Result};
use axum::{response::Redirect, routing::get, Router};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the full application router.
pub fn app_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin") }))
        .merge(routes::auth_router())
        .nest("/admin", routes::admin_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until the process is stopped.
pub async fn run_server(listen_addr: SocketAddr, state: AdminState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {listen_addr}"))?;

    info!("Listening on http://{listen_addr}");
    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
