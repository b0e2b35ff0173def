//! PostgreSQL stores using sqlx.
//!
//! Provides `PostgresUserStore` and `PostgresTodoStore` over a shared
//! `sqlx::PgPool`, plus [`ensure_schema`] which creates the tables if absent.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag.

use crate::config::DatabaseConfig;
use crate::core::store::{NewTodo, NewUser, Todo, TodoStore, User, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Open a connection pool for `config`
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.url())
        .await
        .map_err(|e| anyhow!("Failed to connect to postgres: {}", e))
}

/// Create the `users` and `todos` tables if they do not exist
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE,
            user_email TEXT NOT NULL UNIQUE,
            user_pwd TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create users table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
            id BIGSERIAL PRIMARY KEY,
            uuid UUID NOT NULL UNIQUE,
            content TEXT NOT NULL,
            user_uuid TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create todos table: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_todos_user_uuid ON todos (user_uuid)")
        .execute(pool)
        .await
        .map_err(|e| anyhow!("Failed to create todos index: {}", e))?;

    Ok(())
}

#[derive(Clone, Debug)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: NewUser) -> Result<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (uuid, user_email, user_pwd)
             VALUES ($1, $2, $3)
             RETURNING id, uuid, user_email, user_pwd",
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("{}", e))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, uuid, user_email, user_pwd FROM users WHERE user_email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("{}", e))
    }
}

#[derive(Clone, Debug)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (uuid, content, user_uuid)
             VALUES ($1, $2, $3)
             RETURNING id, uuid, content, user_uuid",
        )
        .bind(Uuid::new_v4())
        .bind(&todo.content)
        .bind(&todo.owner_uuid)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| anyhow!("{}", e))
    }

    async fn get(&self, id: i64) -> Result<Option<Todo>> {
        sqlx::query_as::<_, Todo>("SELECT id, uuid, content, user_uuid FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("{}", e))
    }

    async fn list_by_owner(&self, owner_uuid: &str) -> Result<Vec<Todo>> {
        sqlx::query_as::<_, Todo>(
            "SELECT id, uuid, content, user_uuid FROM todos WHERE user_uuid = $1 ORDER BY id",
        )
        .bind(owner_uuid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("{}", e))
    }

    async fn save(&self, todo: &Todo) -> Result<Todo> {
        sqlx::query_as::<_, Todo>(
            "UPDATE todos SET content = $2 WHERE id = $1
             RETURNING id, uuid, content, user_uuid",
        )
        .bind(todo.id)
        .bind(&todo.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!("{}", e))?
        .ok_or_else(|| anyhow!("Failed to update todo: no row with id {}", todo.id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("{}", e))?;
        Ok(result.rows_affected() > 0)
    }
}
