//! The `todos` resource: schema, storage, handlers, and routes.

pub mod handlers;
pub mod model;
pub mod repository;
pub mod routes;

pub use model::{Todo, TodoWithId};
pub use repository::{InMemoryTodoRepository, MongoTodoRepository, StorageError, TodoRepository};
