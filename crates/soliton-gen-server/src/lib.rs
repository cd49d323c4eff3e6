//! HTTP surface for soliton-gen.
//!
//! JSON twins of every CLI operation, `/preview` variants that render
//! without writing, and read-back endpoints over already generated code.
//! Handlers hand the synchronous core to `spawn_blocking`; concurrent
//! requests against the same project are not serialized.

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiResult, ServerError};
pub use state::AppState;

use handlers::{ddd, domains, meta, projects, services};

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects/init", post(projects::init))
        .route("/projects/init/preview", post(projects::init))
        .route("/projects/tidy", post(projects::tidy))
        .route("/projects/switch", post(projects::switch))
        .route("/projects/list", get(projects::list))
        // Domains
        .route("/domains", post(domains::generate))
        .route("/domains/preview", post(domains::generate))
        .route("/domains/list", get(domains::list))
        .route("/domains/:name", get(domains::detail).delete(domains::delete))
        .route("/field-types", get(domains::field_types))
        // Services
        .route("/services", post(services::generate))
        .route("/services/preview", post(services::generate))
        .route("/services/list", get(services::list))
        .route("/services/detect/:name", get(services::detect))
        .route("/services/:name", get(services::detail).delete(services::delete))
        // DDD artifacts
        .route("/ddd/valueobjects", post(ddd::value_object))
        .route("/ddd/valueobjects/preview", post(ddd::value_object))
        .route("/ddd/specs", post(ddd::specification))
        .route("/ddd/specs/preview", post(ddd::specification))
        .route("/ddd/policies", post(ddd::policy))
        .route("/ddd/policies/preview", post(ddd::policy))
        .route("/ddd/events", post(ddd::event))
        .route("/ddd/events/preview", post(ddd::event))
        .route("/ddd/event-handlers", post(ddd::event_handler))
        .route("/ddd/event-handlers/preview", post(ddd::event_handler))
        .route("/ddd/list", get(ddd::list))
        .route("/ddd/detail", get(ddd::detail))
        .route("/ddd/source", get(ddd::source))
        .route("/ddd/delete", post(ddd::delete))
        .route("/ddd/rename", post(ddd::rename))
        // Project layout
        .route("/layout", get(meta::layout));

    Router::new()
        .route("/health", get(meta::health))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let project_dir = state.project_dir().display().to_string();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, project_dir = %project_dir, "soliton-gen server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
