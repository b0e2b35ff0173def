//! Configuration loading and management
//!
//! A service reads an optional YAML file (named by `SERVICE_CONFIG`), then
//! applies environment overrides, then validates. `.env` files are honoured.

use crate::core::error::ConfigError;
use crate::core::token::DEFAULT_TOKEN_TTL_SECS;
use serde::{Deserialize, Serialize};

/// Which binary is being configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    User,
    Todo,
}

impl ServiceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::User => "user-service",
            ServiceKind::Todo => "todo-service",
        }
    }

    /// The frontend origin allowed by default
    pub fn default_cors_origin(&self) -> Option<&'static str> {
        match self {
            ServiceKind::User => Some("http://localhost:5173"),
            ServiceKind::Todo => None,
        }
    }
}

/// Connection settings for the relational store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_token_ttl() -> i64 {
    DEFAULT_TOKEN_TTL_SECS
}

/// Settings shared by both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// HMAC secret for signing and verifying tokens (required)
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,

    #[serde(default)]
    pub cors_origin: Option<String>,

    /// Absent means the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
            cors_origin: None,
            database: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Full startup load: `.env`, optional YAML file, environment, defaults, validation
    pub fn load(kind: ServiceKind) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let mut config = match std::env::var("SERVICE_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.apply_defaults(kind);
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_value("PORT", &port)?;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            self.token_ttl_secs = parse_value("TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            self.cors_origin = Some(origin);
        }
        self.apply_database_overrides(&lookup)
    }

    fn apply_database_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        const KEYS: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME"];
        let values: Vec<Option<String>> = KEYS.iter().map(|k| lookup(k)).collect();
        if values.iter().all(Option::is_none) {
            return Ok(());
        }

        let current = self.database.take();
        let pick = |idx: usize, existing: Option<String>| -> Result<String, ConfigError> {
            values[idx]
                .clone()
                .or(existing)
                .ok_or_else(|| ConfigError::MissingField {
                    field: KEYS[idx].to_string(),
                    context: "database config".to_string(),
                })
        };

        let host = pick(0, current.as_ref().map(|d| d.host.clone()))?;
        let port = pick(1, current.as_ref().map(|d| d.port.to_string()))?;
        let user = pick(2, current.as_ref().map(|d| d.user.clone()))?;
        let password = pick(3, current.as_ref().map(|d| d.password.clone()))?;
        let name = pick(4, current.as_ref().map(|d| d.name.clone()))?;

        self.database = Some(DatabaseConfig {
            host,
            port: parse_value("DB_PORT", &port)?,
            user,
            password,
            name,
        });
        Ok(())
    }

    /// Fill per-service defaults that YAML and environment left unset
    pub fn apply_defaults(&mut self, kind: ServiceKind) {
        if self.cors_origin.is_none() {
            self.cors_origin = kind.default_cors_origin().map(str::to_string);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "jwt_secret".to_string(),
                context: "service config".to_string(),
            });
        }
        if self.token_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "token_ttl_secs".to_string(),
                value: self.token_ttl_secs.to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}
