//! Entity store traits
//!
//! Stores are the only shared mutable state. They generate ids and uuids,
//! enforce uniqueness, and report failures through `anyhow` with the
//! backend's message intact.

use anyhow::Result;
use async_trait::async_trait;

pub use crate::entities::todo::{NewTodo, Todo};
pub use crate::entities::user::{NewUser, User};

/// Persistence for users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; fails if the email is already taken
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Persistence for todos
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: NewTodo) -> Result<Todo>;

    async fn get(&self, id: i64) -> Result<Option<Todo>>;

    /// Todos owned by `owner_uuid`, ordered by id
    async fn list_by_owner(&self, owner_uuid: &str) -> Result<Vec<Todo>>;

    /// Persist the mutable fields of an existing todo
    async fn save(&self, todo: &Todo) -> Result<Todo>;

    /// Remove a todo, returning whether a row was deleted
    async fn delete(&self, id: i64) -> Result<bool>;
}
