//! REST API for a list of todo items backed by MongoDB.
//!
//! # Overview
//! `app` builds the service; `run` serves it on a caller-provided listener
//! until Ctrl-C or SIGTERM. Storage is handed in through `AppState` as a
//! `TodoRepository`, so the binary owns its MongoDB client and tests can use
//! `InMemoryTodoRepository`.
//!
//! # Design
//! - Validation happens in extractors (`validation`), so handlers only see
//!   well-formed ids and todos.
//! - Handlers return `Result<_, AppError>`; `error::render_errors` turns
//!   every error into `{ message, stack }` in one place. Unknown paths and
//!   unsupported methods on known paths both take the 404 fallback.
//! - Trailing slashes are trimmed before routing, so `/api/v1/todos/` is
//!   `/api/v1/todos`.
//! - PUT is a full replacement: omitting `done` stores `false`.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;
pub mod todos;
pub mod validation;

use std::sync::Arc;

use axum::{extract::Request, middleware, routing::get, Router, ServiceExt};
use tokio::{net::TcpListener, signal};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

pub use config::{Config, Environment};
pub use error::AppError;
pub use todos::{InMemoryTodoRepository, MongoTodoRepository, Todo, TodoRepository, TodoWithId};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(todos: Arc<dyn TodoRepository>, environment: Environment) -> Self {
        Self { todos, environment }
    }
}

/// The routed API with error rendering, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let environment = state.environment;
    Router::new()
        .route("/", get(routes::root))
        .nest("/api/v1", routes::api_v1())
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(
            environment,
            error::render_errors,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub type App = NormalizePath<Router>;

/// `router` behind trailing-slash trimming. Path rewriting has to happen
/// before routing, so the layer wraps the router instead of sitting inside it.
pub fn app(state: AppState) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    let app = ServiceExt::<Request>::into_make_service(app(state));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
