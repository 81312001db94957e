//! @ai:module:intent HTTP surface: form endpoints, health checks and server startup
//! @ai:module:layer infrastructure
//! @ai:module:public_api start_server, create_router, AppState

pub mod handlers;
pub mod routing;
pub mod types;

pub use routing::create_router;
pub use types::{
    ApiFailure, AppState, ErrorResponse, StatusResponse, SuccessResponse, ValidationErrorsBody,
    VersionResponse,
};

use crate::completion::TextCompletion;
use crate::delivery::Mailer;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// @ai:intent Bind and serve the API until ctrl-c
/// @ai:effects network
pub async fn start_server<C, M>(addr: SocketAddr, state: AppState<C, M>) -> Result<()>
where
    C: TextCompletion + 'static,
    M: Mailer + 'static,
{
    tracing::info!("Starting idea evaluator server on {addr}");

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
