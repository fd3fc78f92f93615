use axum::{routing::get, Router};

use crate::{routes::not_found, todos::handlers, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::find_all).post(handlers::create))
        .route(
            "/{id}",
            get(handlers::find_one)
                .put(handlers::replace)
                .delete(handlers::delete),
        )
        .method_not_allowed_fallback(not_found)
}
