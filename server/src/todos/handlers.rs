//! Request handlers for `/api/v1/todos`.
//!
//! Inputs arrive already validated through `ValidParams` / `ValidBody`;
//! every failure is returned as an `AppError` and rendered at the boundary.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppError,
    todos::model::{Todo, TodoWithId},
    validation::{IdParams, ValidBody, ValidParams},
    AppState,
};

pub async fn find_all(State(state): State<AppState>) -> Result<Json<Vec<TodoWithId>>, AppError> {
    let todos = state.todos.list_all().await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

pub async fn find_one(
    State(state): State<AppState>,
    ValidParams(IdParams { id }): ValidParams<IdParams>,
) -> Result<Json<TodoWithId>, AppError> {
    let found = state.todos.find_by_id(id).await?;
    found.map(Json).ok_or(AppError::NotFound { id })
}

pub async fn create(
    State(state): State<AppState>,
    ValidBody(todo): ValidBody<Todo>,
) -> Result<(StatusCode, Json<TodoWithId>), AppError> {
    let created = state.todos.insert(todo).await?;
    tracing::debug!(id = %created.id, "created todo");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn replace(
    State(state): State<AppState>,
    ValidParams(IdParams { id }): ValidParams<IdParams>,
    ValidBody(todo): ValidBody<Todo>,
) -> Result<Json<TodoWithId>, AppError> {
    let updated = state.todos.replace_by_id(id, todo).await?;
    updated.map(Json).ok_or(AppError::NotFound { id })
}

pub async fn delete(
    State(state): State<AppState>,
    ValidParams(IdParams { id }): ValidParams<IdParams>,
) -> Result<StatusCode, AppError> {
    if !state.todos.delete_by_id(id).await? {
        return Err(AppError::NotFound { id });
    }
    tracing::debug!(%id, "deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
