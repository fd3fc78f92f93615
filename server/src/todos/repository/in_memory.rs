use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{StorageError, TodoRepository};
use crate::todos::model::{Todo, TodoWithId};

/// In-memory todo storage.
///
/// Intended for tests/dev. Lists in id order, which is creation order for
/// ids generated in this process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<BTreeMap<ObjectId, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn with_id(id: ObjectId, todo: &Todo) -> TodoWithId {
    TodoWithId {
        id,
        todo: todo.clone(),
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_all(&self) -> Result<Vec<TodoWithId>, StorageError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().map(|(id, todo)| with_id(*id, todo)).collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<TodoWithId>, StorageError> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).map(|todo| with_id(id, todo)))
    }

    async fn insert(&self, todo: Todo) -> Result<TodoWithId, StorageError> {
        let id = ObjectId::new();
        self.todos.write().await.insert(id, todo.clone());
        Ok(TodoWithId { id, todo })
    }

    async fn replace_by_id(
        &self,
        id: ObjectId,
        todo: Todo,
    ) -> Result<Option<TodoWithId>, StorageError> {
        let mut todos = self.todos.write().await;
        let Some(slot) = todos.get_mut(&id) else {
            return Ok(None);
        };
        *slot = todo;
        Ok(Some(with_id(id, slot)))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StorageError> {
        Ok(self.todos.write().await.remove(&id).is_some())
    }

    async fn reset(&self) {
        self.todos.write().await.clear();
    }
}
