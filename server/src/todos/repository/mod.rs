//! Todo persistence boundary.
//!
//! `TodoRepository` is what handlers talk to. `MongoTodoRepository` is the
//! production backend; `InMemoryTodoRepository` backs tests and local runs
//! that have no MongoDB at hand.

pub mod in_memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::todos::model::{Todo, TodoWithId};

pub use in_memory::InMemoryTodoRepository;
pub use mongo::MongoTodoRepository;

/// Failures talking to the document store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store accepted the insert but did not report the new id.
    #[error("Error inserting todo.")]
    InsertNotAcknowledged,

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// Failure reported by a non-MongoDB backend.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// CRUD over the `todos` collection. Every method is a single-document
/// (or single-read) operation; atomicity comes from the backend.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<TodoWithId>, StorageError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<TodoWithId>, StorageError>;

    async fn insert(&self, todo: Todo) -> Result<TodoWithId, StorageError>;

    /// Replaces every field of the todo. Returns `None` if no todo has `id`.
    async fn replace_by_id(
        &self,
        id: ObjectId,
        todo: Todo,
    ) -> Result<Option<TodoWithId>, StorageError>;

    /// Returns whether a todo was removed.
    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StorageError>;

    /// Empties the collection. Failures are logged and ignored.
    async fn reset(&self);
}
