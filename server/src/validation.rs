//! Request validation.
//!
//! # Design
//! A `Schema` turns a raw `serde_json::Value` into a typed, normalized value
//! or a `ValidationError` listing every field that failed. The extractors
//! below gather one request part (path params, query string, or body) into a
//! `Value`, run the schema, and reject with `AppError::Validation`, which
//! renders as 422. Handlers taking these extractors only ever see valid data.

use std::{collections::HashMap, fmt};

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

/// One failed check: where it failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(path, message)])
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A shape that raw request data can be checked against.
pub trait Schema: Sized {
    fn validate(value: &Value) -> Result<Self, ValidationError>;
}

/// Name of a JSON value's type, as used in validation messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Borrows `value` as an object or fails with a root-level issue.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| {
        ValidationError::single("", format!("Expected object, received {}", kind_of(value)))
    })
}

/// Path parameters naming a single stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParams {
    pub id: ObjectId,
}

impl Schema for IdParams {
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = expect_object(value)?;
        match object.get("id") {
            Some(Value::String(raw)) => ObjectId::parse_str(raw)
                .map(|id| IdParams { id })
                .map_err(|_| ValidationError::single("id", "Invalid ObjectId")),
            Some(other) => Err(ValidationError::single(
                "id",
                format!("Expected string, received {}", kind_of(other)),
            )),
            None => Err(ValidationError::single("id", "Required")),
        }
    }
}

fn string_map(raw: HashMap<String, String>) -> Value {
    Value::Object(
        raw.into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    )
}

/// Validated path parameters.
#[derive(Debug, Clone)]
pub struct ValidParams<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidParams<T>
where
    T: Schema + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::single("params", rejection.body_text()))?;
        Ok(ValidParams(T::validate(&string_map(raw))?))
    }
}

/// Validated query string.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: Schema + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::single("query", rejection.body_text()))?;
        Ok(ValidQuery(T::validate(&string_map(raw))?))
    }
}

/// Validated JSON body. An empty body is treated as `{}`.
#[derive(Debug, Clone)]
pub struct ValidBody<T>(pub T);

impl<T, S> FromRequest<S> for ValidBody<T>
where
    T: Schema + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = if bytes.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&bytes).map_err(|err| {
                ValidationError::single("body", format!("Malformed JSON: {err}"))
            })?
        };
        Ok(ValidBody(T::validate(&value)?))
    }
}
