//! # todo-services
//!
//! Two small REST services sharing one request pipeline:
//!
//! - **user-service**: `POST /register` and `POST /login`, issuing HS256 JWTs
//! - **todo-service**: per-user todo CRUD at `/`, behind bearer-token auth
//!
//! ## Request pipeline
//!
//! Authentication gate → lookup → ownership policy → schema validation →
//! store mutation → resource transformer → response.
//!
//! - [`core::auth`]: extracts and verifies the bearer token, binds an [`core::Identity`]
//! - [`core::policy`]: pure ownership predicates
//! - [`core::validation`]: declarative field schemas and the `Validated<T>` extractor
//! - [`core::resource`]: client-facing views without hashes or owner references
//! - [`entities`]: per-entity model, service, handlers and route descriptor
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use todo_services::prelude::*;
//!
//! let config = ServiceConfig::load(ServiceKind::Todo)?;
//! let store = app::open_todo_store(&config).await?;
//! app::todo_service(&config, store).serve(&config.addr()).await?;
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AuthError, AuthProvider, AuthState, Envelope, EntityError, Identity, PasswordHasher,
        ServiceError, ServiceResult, ToResource, TodoPolicy, TodoStore, TokenIssuer, UserPolicy,
        UserStore,
        validation::{Rule, Schema, Validated, ValidatedInput},
    };

    // === Entities ===
    pub use crate::entities::todo::{
        CreateTodoInput, Todo, TodoDescriptor, TodoService, UpdateTodoInput,
    };
    pub use crate::entities::user::{LoginInput, RegisterInput, User, UserDescriptor, UserService};

    // === Storage ===
    pub use crate::storage::{InMemoryTodoStore, InMemoryUserStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresTodoStore, PostgresUserStore};

    // === Config / Server ===
    pub use crate::app;
    pub use crate::config::{DatabaseConfig, ServiceConfig, ServiceKind};
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
