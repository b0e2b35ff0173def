//! Core building blocks shared by both services

pub mod auth;
pub mod envelope;
pub mod error;
pub mod password;
pub mod policy;
pub mod resource;
pub mod store;
pub mod token;
pub mod validation;

pub use auth::{AuthProvider, AuthState, Identity, JwtAuthProvider, require_auth};
pub use envelope::Envelope;
pub use error::{
    AuthError, ConfigError, EntityError, FieldError, ServiceError, ServiceResult, StorageError,
    ValidationError,
};
pub use password::{Argon2Hasher, PasswordHasher};
pub use policy::{TodoPolicy, UserPolicy};
pub use resource::{ToResource, TodoResource, UserResource};
pub use store::{TodoStore, UserStore};
pub use token::{Claims, TokenIssuer};
