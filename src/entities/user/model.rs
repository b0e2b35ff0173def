//! User entity and its request inputs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::validation::{Rule, Schema, ValidatedInput};

/// A registered user
///
/// Created on registration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub uuid: Uuid,
    #[cfg_attr(feature = "postgres", sqlx(rename = "user_email"))]
    pub email: String,
    #[cfg_attr(feature = "postgres", sqlx(rename = "user_pwd"))]
    pub password_hash: String,
}

/// Row to insert; the store assigns `id` and `uuid`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

/// Body of `POST /register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

impl ValidatedInput for RegisterInput {
    fn schema() -> Schema {
        Schema::new()
            .field("email", [Rule::RequiredString, Rule::EmailFormat])
            .field("password", [Rule::RequiredString, Rule::MinLength(6)])
    }
}

/// Body of `POST /login`
///
/// Not schema-validated: anything missing is just a failed login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginInput {
    /// Lenient read from an arbitrary JSON body; non-string fields count as absent
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        };
        Self {
            email: field("email"),
            password: field("password"),
        }
    }
}
