//! Route table of the user service
//!
//! `/register` and `/login` are public; there is no authentication layer.

use std::sync::Arc;

use axum::Router;
use axum::routing::post;

use crate::server::entity_registry::EntityDescriptor;

use super::handlers::{UserState, login, register};
use super::service::UserService;

/// Public routes of the user service
pub struct UserDescriptor {
    state: UserState,
}

impl UserDescriptor {
    pub fn new(service: Arc<UserService>) -> Self {
        Self {
            state: UserState { service },
        }
    }
}

impl EntityDescriptor for UserDescriptor {
    fn entity_type(&self) -> &str {
        "user"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
            .with_state(self.state.clone())
    }
}
