//! Todo entity and its request inputs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::validation::{Rule, Schema, ValidatedInput};

/// A todo item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Todo {
    pub id: i64,
    pub uuid: Uuid,
    pub content: String,
    /// uuid of the owning user; immutable after creation
    #[cfg_attr(feature = "postgres", sqlx(rename = "user_uuid"))]
    pub owner_uuid: String,
}

impl Todo {
    /// Merge the fields present in `patch`; everything else is left untouched
    pub fn apply(&mut self, patch: UpdateTodoInput) {
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: String,
    pub owner_uuid: String,
}

/// Body of `POST /`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoInput {
    pub content: String,
}

impl ValidatedInput for CreateTodoInput {
    fn schema() -> Schema {
        Schema::new().field("content", [Rule::RequiredString])
    }
}

/// Body of `PUT /{id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoInput {
    #[serde(default)]
    pub content: Option<String>,
}

impl ValidatedInput for UpdateTodoInput {
    fn schema() -> Schema {
        Schema::new().field("content", [Rule::OptionalString])
    }
}
