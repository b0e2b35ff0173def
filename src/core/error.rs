//! Typed error handling for the user and todo services
//!
//! Every failure a request can hit is a [`ServiceError`]. Each category knows
//! its HTTP status and a stable error code, so handlers can simply return
//! `Result<_, ServiceError>` and let the error render itself.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: the request body failed the validation pipeline
//! - [`AuthError`]: authentication gate, credential and ownership failures
//! - [`EntityError`]: missing rows and uniqueness conflicts
//! - [`StorageError`]: opaque failures from the entity store
//! - [`ConfigError`]: configuration loading problems at startup
//!
//! # Example
//!
//! ```rust,ignore
//! use todo_services::prelude::*;
//!
//! async fn load(service: &TodoService, id: i64) -> ServiceResult<Todo> {
//!     service.find(id).await?.ok_or_else(|| EntityError::todo_not_found(id).into())
//! }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::core::envelope::Envelope;

/// The main error type for both services
#[derive(Debug)]
pub enum ServiceError {
    /// Input validation errors
    Validation(ValidationError),

    /// Authentication and authorization errors
    Auth(AuthError),

    /// Entity lookup and uniqueness errors
    Entity(EntityError),

    /// Entity store errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(e) => write!(f, "{}", e),
            ServiceError::Auth(e) => write!(f, "{}", e),
            ServiceError::Entity(e) => write!(f, "{}", e),
            ServiceError::Storage(e) => write!(f, "{}", e),
            ServiceError::Config(e) => write!(f, "{}", e),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Validation(e) => Some(e),
            ServiceError::Auth(e) => Some(e),
            ServiceError::Entity(e) => Some(e),
            ServiceError::Storage(e) => Some(e),
            ServiceError::Config(e) => Some(e),
            ServiceError::Internal(_) => None,
        }
    }
}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(e) => e.status_code(),
            ServiceError::Auth(e) => e.status_code(),
            ServiceError::Entity(e) => e.status_code(),
            // Store failures are reported as client errors with the raw message.
            ServiceError::Storage(_) => StatusCode::BAD_REQUEST,
            ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(e) => e.error_code(),
            ServiceError::Auth(e) => e.error_code(),
            ServiceError::Entity(e) => e.error_code(),
            ServiceError::Storage(_) => "STORAGE_ERROR",
            ServiceError::Config(_) => "CONFIG_ERROR",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message
    ///
    /// Differs from `Display` only for field validation, where the field
    /// details travel in the response payload instead of the message.
    pub fn message(&self) -> String {
        match self {
            ServiceError::Validation(ValidationError::FieldErrors(_)) => {
                "Validation failed".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Additional details for the error, rendered as the envelope's `data`
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Validation(ValidationError::FieldErrors(errors)) => {
                serde_json::to_value(errors).ok()
            }
            _ => None,
        }
    }

    /// Convert to a failure envelope
    pub fn to_envelope(&self) -> Envelope<serde_json::Value> {
        Envelope::failure(self.message(), self.details())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() || matches!(self, ServiceError::Storage(_)) {
            tracing::warn!(code = self.error_code(), "request failed: {}", self);
        }
        self.to_envelope().into_response_with(status)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields violated the schema
    FieldErrors(Vec<FieldError>),

    /// The request body was not valid JSON
    InvalidJson { message: String },

    /// A body was sent without an `application/json` content type
    UnsupportedMediaType,
}

/// A single field-level violation produced by the validation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending input field
    pub field: String,
    /// Rule that was violated (`required`, `string`, `email`, `min_length`)
    pub constraint: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation failed: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::UnsupportedMediaType => {
                write!(f, "Expected request with `Content-Type: application/json`")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_FAILED",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Authentication gate, credential and ownership failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The `Authorization` header is absent
    NoToken,

    /// The header carries no token segment after the scheme
    MalformedToken,

    /// Signature, expiry or payload verification failed
    InvalidToken,

    /// Unknown email or wrong password (deliberately indistinguishable)
    InvalidCredentials,

    /// The requester does not own the entity
    Forbidden,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NoToken => write!(f, "No token provided"),
            AuthError::MalformedToken => write!(f, "Malformed token"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::Forbidden => write!(f, "Forbidden"),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoToken => StatusCode::UNAUTHORIZED,
            AuthError::MalformedToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoToken => "NO_TOKEN",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Auth(err)
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookups and uniqueness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// No row with this id
    NotFound { entity_type: String, id: i64 },

    /// A unique field is already taken
    AlreadyExists {
        entity_type: String,
        field: String,
        value: String,
    },
}

impl EntityError {
    pub fn todo_not_found(id: i64) -> Self {
        EntityError::NotFound {
            entity_type: "Todo".to_string(),
            id,
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        EntityError::AlreadyExists {
            entity_type: "User".to_string(),
            field: "Email".to_string(),
            value: email.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            // The user service answers a taken email with 401.
            EntityError::AlreadyExists { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, .. } => {
                write!(f, "{} not found", entity_type)
            }
            EntityError::AlreadyExists { field, .. } => {
                write!(f, "{} already exists", field)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl From<EntityError> for ServiceError {
    fn from(err: EntityError) -> Self {
        ServiceError::Entity(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by entity store backends
#[derive(Debug)]
pub enum StorageError {
    /// A store operation failed; the backend's message is kept verbatim
    Backend { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

/// Store traits report through `anyhow`; the message is surfaced unchanged.
impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Storage(StorageError::Backend {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_not_found_display() {
        let err = EntityError::todo_not_found(7);
        assert_eq!(err.to_string(), "Todo not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_email_maps_to_401() {
        let err: ServiceError = EntityError::duplicate_email("a@b.io").into();
        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), "ENTITY_ALREADY_EXISTS");
    }

    #[test]
    fn test_validation_message_hides_field_list() {
        let err = ServiceError::Validation(ValidationError::FieldErrors(vec![
            FieldError::new("email", "email", "must be a valid email address"),
            FieldError::new("password", "min_length", "must be at least 6 characters"),
        ]));
        assert_eq!(err.message(), "Validation failed");
        assert!(err.to_string().contains("email"));
        assert!(err.to_string().contains("password"));

        let details = err.details().unwrap();
        assert_eq!(details.as_array().unwrap().len(), 2);
        assert_eq!(details[1]["constraint"], "min_length");
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(AuthError::NoToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::MalformedToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_error_keeps_message_and_is_client_error() {
        let err: ServiceError =
            anyhow::anyhow!("duplicate key value violates unique constraint").into();
        assert_eq!(
            err.to_string(),
            "duplicate key value violates unique constraint"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_envelope_for_error() {
        let env = ServiceError::from(AuthError::Forbidden).to_envelope();
        assert!(!env.success);
        assert_eq!(env.message, "Forbidden");
        assert!(env.data.is_none());
    }

    #[test]
    fn test_unsupported_media_type_is_415() {
        let err: ServiceError = ValidationError::UnsupportedMediaType.into();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.message(), "Expected request with `Content-Type: application/json`");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ServiceError = json_err.into();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidJson { .. })
        ));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingField {
            field: "jwt_secret".to_string(),
            context: "service config".to_string(),
        };
        assert!(err.to_string().contains("jwt_secret"));
    }
}
