//! In-memory stores for testing and development
//!
//! Tables live behind `Arc<RwLock<..>>`. Ids are sequential from 1, uuids
//! are random v4, and unique columns are enforced like a relational store
//! would, including the wording of the error.

use crate::core::store::{NewTodo, NewUser, Todo, TodoStore, User, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

fn unique_violation(constraint: &str) -> anyhow::Error {
    anyhow!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    )
}

#[derive(Default)]
struct UserTable {
    next_id: i64,
    rows: BTreeMap<i64, User>,
    uuids: HashSet<Uuid>,
}

/// In-memory user store
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn count(&self) -> Result<usize> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(table.rows.len())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if table.rows.values().any(|u| u.email == user.email) {
            return Err(unique_violation("users_user_email_key"));
        }

        let uuid = Uuid::new_v4();
        if !table.uuids.insert(uuid) {
            return Err(unique_violation("users_uuid_key"));
        }

        table.next_id += 1;
        let created = User {
            id: table.next_id,
            uuid,
            email: user.email,
            password_hash: user.password_hash,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
struct TodoTable {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
    uuids: HashSet<Uuid>,
}

/// In-memory todo store
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    table: Arc<RwLock<TodoTable>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let uuid = Uuid::new_v4();
        if !table.uuids.insert(uuid) {
            return Err(unique_violation("todos_uuid_key"));
        }

        table.next_id += 1;
        let created = Todo {
            id: table.next_id,
            uuid,
            content: todo.content,
            owner_uuid: todo.owner_uuid,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner_uuid: &str) -> Result<Vec<Todo>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table
            .rows
            .values()
            .filter(|t| t.owner_uuid == owner_uuid)
            .cloned()
            .collect())
    }

    async fn save(&self, todo: &Todo) -> Result<Todo> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let row = table
            .rows
            .get_mut(&todo.id)
            .ok_or_else(|| anyhow!("Failed to update todo: no row with id {}", todo.id))?;

        // id, uuid and owner are immutable
        row.content = todo.content.clone();

        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match table.rows.remove(&id) {
            Some(removed) => {
                table.uuids.remove(&removed.uuid);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
