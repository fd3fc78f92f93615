//! Top-level routes: greetings, the versioned API, and the fallback.

use axum::{extract::OriginalUri, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, todos, AppState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub async fn root() -> Json<Message> {
    Message::new("Hi from the / route 👋")
}

pub async fn api_root() -> Json<Message> {
    Message::new("API - 👋🌎🌍🌏")
}

/// Fallback for unknown paths and for unsupported methods on known ones.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        path: uri.to_string(),
    }
}

/// Everything served under `/api/v1`.
pub fn api_v1() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/todos", todos::routes::router())
        .method_not_allowed_fallback(not_found)
}
