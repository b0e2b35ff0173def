//! Wiring for the two services
//!
//! Services are built once at startup and shared with handlers through
//! `Arc`. The binaries and the integration tests both go through here.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use crate::config::{ServiceConfig, ServiceKind};
use crate::core::auth::AuthState;
use crate::core::error::ConfigError;
use crate::core::password::{Argon2Hasher, PasswordHasher};
use crate::core::store::{TodoStore, UserStore};
use crate::core::token::TokenIssuer;
use crate::entities::todo::{TodoDescriptor, TodoService};
use crate::entities::user::{UserDescriptor, UserService};
use crate::server::ServerBuilder;
use crate::storage::{InMemoryTodoStore, InMemoryUserStore};

fn token_issuer(config: &ServiceConfig) -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs))
}

/// Builder for the user service (`/register`, `/login`)
pub fn user_service(config: &ServiceConfig, store: Arc<dyn UserStore>) -> ServerBuilder {
    user_service_with_hasher(config, store, Arc::new(Argon2Hasher))
}

pub fn user_service_with_hasher(
    config: &ServiceConfig,
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
) -> ServerBuilder {
    let service = Arc::new(UserService::new(store, hasher, token_issuer(config)));
    ServerBuilder::new(ServiceKind::User)
        .register(UserDescriptor::new(service))
        .with_cors_origin(config.cors_origin.clone())
}

/// Builder for the todo service (authenticated CRUD at `/`)
pub fn todo_service(config: &ServiceConfig, store: Arc<dyn TodoStore>) -> ServerBuilder {
    let service = Arc::new(TodoService::new(store));
    let auth = AuthState::jwt(token_issuer(config));
    ServerBuilder::new(ServiceKind::Todo)
        .register(TodoDescriptor::new(service, auth))
        .with_cors_origin(config.cors_origin.clone())
}

/// User service router over a fresh in-memory store
pub fn user_router(config: &ServiceConfig) -> Result<Router, ConfigError> {
    user_service(config, Arc::new(InMemoryUserStore::new())).build()
}

/// Todo service router over a fresh in-memory store
pub fn todo_router(config: &ServiceConfig) -> Result<Router, ConfigError> {
    todo_service(config, Arc::new(InMemoryTodoStore::new())).build()
}

#[cfg(feature = "postgres")]
async fn postgres_pool(db: &crate::config::DatabaseConfig) -> Result<sqlx::PgPool> {
    let pool = crate::storage::postgres::connect(db).await?;
    crate::storage::postgres::ensure_schema(&pool).await?;
    tracing::info!(host = %db.host, database = %db.name, "connected to postgres");
    Ok(pool)
}

/// Pick the user store from configuration
///
/// Postgres when a database section is configured and the feature is on,
/// otherwise in-memory. Connection or schema failures are returned.
pub async fn open_user_store(config: &ServiceConfig) -> Result<Arc<dyn UserStore>> {
    #[cfg(feature = "postgres")]
    if let Some(db) = &config.database {
        let pool = postgres_pool(db).await?;
        return Ok(Arc::new(crate::storage::PostgresUserStore::new(pool)));
    }

    warn_if_database_ignored(config);
    Ok(Arc::new(InMemoryUserStore::new()))
}

/// Pick the todo store from configuration
pub async fn open_todo_store(config: &ServiceConfig) -> Result<Arc<dyn TodoStore>> {
    #[cfg(feature = "postgres")]
    if let Some(db) = &config.database {
        let pool = postgres_pool(db).await?;
        return Ok(Arc::new(crate::storage::PostgresTodoStore::new(pool)));
    }

    warn_if_database_ignored(config);
    Ok(Arc::new(InMemoryTodoStore::new()))
}

fn warn_if_database_ignored(config: &ServiceConfig) {
    if config.database.is_some() && !cfg!(feature = "postgres") {
        tracing::warn!("database configured but the postgres feature is disabled");
    }
    tracing::info!("using in-memory store");
}
