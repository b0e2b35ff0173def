//! Shared fixtures for the integration tests

#![allow(dead_code)]

use axum_test::TestServer;
use todo_services::prelude::*;

pub const SECRET: &str = "integration-secret";

pub fn config() -> ServiceConfig {
    ServiceConfig {
        jwt_secret: SECRET.to_string(),
        ..ServiceConfig::default()
    }
}

pub fn user_server() -> TestServer {
    TestServer::new(app::user_router(&config()).unwrap())
}

pub fn todo_server() -> TestServer {
    TestServer::new(app::todo_router(&config()).unwrap())
}

/// A token the todo service will accept for `uuid`
pub fn token_for(uuid: &str) -> String {
    TokenIssuer::new(SECRET, 3600).issue(uuid).unwrap()
}
