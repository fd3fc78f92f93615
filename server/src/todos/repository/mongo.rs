use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::{StorageError, TodoRepository};
use crate::todos::model::{Todo, TodoWithId, COLLECTION};

/// A todo as MongoDB stores it, keyed by `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    content: String,
    #[serde(default)]
    done: bool,
}

impl TodoDocument {
    fn new(id: ObjectId, todo: Todo) -> Self {
        Self {
            id,
            content: todo.content,
            done: todo.done,
        }
    }
}

impl From<TodoDocument> for TodoWithId {
    fn from(doc: TodoDocument) -> Self {
        TodoWithId {
            id: doc.id,
            todo: Todo {
                content: doc.content,
                done: doc.done,
            },
        }
    }
}

/// `TodoRepository` over the `todos` collection of a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoTodoRepository {
    collection: Collection<TodoDocument>,
}

impl MongoTodoRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    async fn list_all(&self) -> Result<Vec<TodoWithId>, StorageError> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        let docs: Vec<TodoDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(TodoWithId::from).collect())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<TodoWithId>, StorageError> {
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(TodoWithId::from))
    }

    async fn insert(&self, todo: Todo) -> Result<TodoWithId, StorageError> {
        // Inserted without `_id` so the server assigns one.
        let result = self
            .collection
            .clone_with_type::<Todo>()
            .insert_one(&todo)
            .await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(StorageError::InsertNotAcknowledged)?;
        Ok(TodoWithId { id, todo })
    }

    async fn replace_by_id(
        &self,
        id: ObjectId,
        todo: Todo,
    ) -> Result<Option<TodoWithId>, StorageError> {
        let replaced = self
            .collection
            .find_one_and_replace(doc! { "_id": id }, TodoDocument::new(id, todo))
            .return_document(ReturnDocument::After)
            .await?;
        Ok(replaced.map(TodoWithId::from))
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, StorageError> {
        let deleted = self.collection.find_one_and_delete(doc! { "_id": id }).await?;
        Ok(deleted.is_some())
    }

    async fn reset(&self) {
        if let Err(err) = self.collection.drop().await {
            tracing::debug!(error = %err, "ignoring failure to drop todos collection");
        }
    }
}
