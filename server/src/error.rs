//! Error types and their HTTP rendering.
//!
//! # Design
//! Handlers and extractors return `AppError`. Its `IntoResponse` impl sets
//! the status and attaches an `ErrorReport` extension but leaves the body
//! empty; `render_errors`, layered once around the whole router, is the
//! only place that writes error bodies. That keeps the production/dev
//! decision about traces in one spot.

use std::fmt::Write as _;

use axum::{
    extract::{rejection::BytesRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::todos::repository::StorageError;
use crate::{config::Environment, validation::ValidationError};

/// Stack placeholder sent instead of diagnostics in production.
pub const REDACTED_STACK: &str = "🥞";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Todo with id \"{id}\" not found.")]
    NotFound { id: ObjectId },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("🔍 - Not Found - {path}")]
    RouteNotFound { path: String },

    /// The request body could not be read at all (too large, aborted).
    #[error(transparent)]
    Payload(#[from] BytesRejection),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Payload(rejection) => rejection.status(),
        }
    }
}

/// What `render_errors` needs to build an error body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub trace: String,
}

impl ErrorReport {
    pub fn new(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = format!("{err:?}");
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(trace, "\n    caused by: {cause}");
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            trace,
        }
    }
}

/// Uniform error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub stack: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let mut response = status.into_response();
        response.extensions_mut().insert(ErrorReport::new(&self));
        response
    }
}

/// Middleware that renders any `ErrorReport` left on a response as an
/// `ErrorBody`. A report on a 200 response is rendered as a 500.
pub async fn render_errors(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    let status = match response.status() {
        StatusCode::OK => StatusCode::INTERNAL_SERVER_ERROR,
        status => status,
    };
    let stack = if environment.is_production() {
        REDACTED_STACK.to_string()
    } else {
        report.trace
    };

    (
        status,
        Json(ErrorBody {
            message: report.message,
            stack,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn router(environment: Environment) -> Router {
        Router::new()
            .route(
                "/missing",
                get(|| async {
                    AppError::NotFound {
                        id: ObjectId::parse_str("632baf8543b57c665969e653").unwrap(),
                    }
                }),
            )
            .route(
                "/broken",
                get(|| async {
                    AppError::from(StorageError::Backend("connection reset".into()))
                }),
            )
            .route(
                "/report-on-ok",
                get(|| async {
                    let mut response = StatusCode::OK.into_response();
                    response.extensions_mut().insert(ErrorReport {
                        message: "late failure".into(),
                        trace: "trace".into(),
                    });
                    response
                }),
            )
            .route("/fine", get(|| async { "fine" }))
            .layer(middleware::from_fn_with_state(environment, render_errors))
    }

    async fn call(environment: Environment, uri: &str) -> (StatusCode, Vec<u8>) {
        let resp = router(environment)
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[test]
    fn statuses_follow_taxonomy() {
        let id = ObjectId::new();
        assert_eq!(
            AppError::from(ValidationError::single("content", "Required")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::NotFound { id }.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::RouteNotFound { path: "/x".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StorageError::InsertNotAcknowledged).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn report_includes_source_chain() {
        let err = AppError::from(StorageError::Backend("connection reset".into()));
        let report = ErrorReport::new(&err);
        assert_eq!(report.message, "storage backend failure: connection reset");
        assert!(report.trace.contains("Backend"));
    }

    #[tokio::test]
    async fn renders_message_and_trace_outside_production() {
        let (status, bytes) = call(Environment::Development, "/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body.message,
            r#"Todo with id "632baf8543b57c665969e653" not found."#
        );
        assert!(body.stack.contains("NotFound"));
    }

    #[tokio::test]
    async fn redacts_trace_in_production() {
        let (status, bytes) = call(Environment::Production, "/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.stack, REDACTED_STACK);
    }

    #[tokio::test]
    async fn report_on_ok_response_becomes_500() {
        let (status, bytes) = call(Environment::Test, "/report-on-ok").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "late failure");
    }

    #[tokio::test]
    async fn passes_through_successful_responses() {
        let (status, bytes) = call(Environment::Development, "/fine").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"fine");
    }
}
