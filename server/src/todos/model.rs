use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{expect_object, kind_of, Issue, Schema, ValidationError};

/// Name of the store collection holding todos.
pub const COLLECTION: &str = "todos";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub content: String,
    #[serde(default)]
    pub done: bool,
}

/// A stored todo as the API returns it: `{ "id", "content", "done" }`, with
/// the id as 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoWithId {
    #[serde(with = "object_id_hex")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub todo: Todo,
}

mod object_id_hex {
    use mongodb::bson::oid::ObjectId;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex).map_err(de::Error::custom)
    }
}

impl Schema for Todo {
    /// `content` must be a non-empty string. `done` defaults to `false` when
    /// absent but must be a boolean when given. Other keys are dropped.
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = expect_object(value)?;
        let mut issues = Vec::new();

        let content = match object.get("content") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                issues.push(Issue::new(
                    "content",
                    "String must contain at least 1 character(s)",
                ));
                None
            }
            Some(other) => {
                issues.push(Issue::new(
                    "content",
                    format!("Expected string, received {}", kind_of(other)),
                ));
                None
            }
            None => {
                issues.push(Issue::new("content", "Required"));
                None
            }
        };

        let done = match object.get("done") {
            None => false,
            Some(Value::Bool(done)) => *done,
            Some(other) => {
                issues.push(Issue::new(
                    "done",
                    format!("Expected boolean, received {}", kind_of(other)),
                ));
                false
            }
        };

        match content {
            Some(content) if issues.is_empty() => Ok(Todo { content, done }),
            _ => Err(ValidationError::new(issues)),
        }
    }
}
