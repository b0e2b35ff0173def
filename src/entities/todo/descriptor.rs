//! Route table of the todo service
//!
//! Every route sits behind the bearer-token gate, applied with `route_layer`
//! so unknown paths still answer 404 instead of 401.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;

use crate::core::auth::{AuthState, require_auth};
use crate::server::entity_registry::EntityDescriptor;

use super::handlers::{TodoState, create_todo, delete_todo, get_todo, list_todos, update_todo};
use super::service::TodoService;

/// Authenticated todo routes mounted at the service root
pub struct TodoDescriptor {
    state: TodoState,
    auth: AuthState,
}

impl TodoDescriptor {
    pub fn new(service: Arc<TodoService>, auth: AuthState) -> Self {
        Self {
            state: TodoState { service },
            auth,
        }
    }
}

impl EntityDescriptor for TodoDescriptor {
    fn entity_type(&self) -> &str {
        "todo"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route("/", get(list_todos).post(create_todo))
            .route(
                "/{id}",
                get(get_todo).put(update_todo).delete(delete_todo),
            )
            .route_layer(from_fn_with_state(self.auth.clone(), require_auth))
            .with_state(self.state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::TokenIssuer;
    use crate::storage::InMemoryTodoStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn router(tokens: Arc<TokenIssuer>) -> Router {
        let service = Arc::new(TodoService::new(Arc::new(InMemoryTodoStore::new())));
        TodoDescriptor::new(service, AuthState::jwt(tokens)).build_routes()
    }

    #[tokio::test]
    async fn test_routes_require_auth() {
        let app = router(Arc::new(TokenIssuer::new("descriptor-secret", 60)));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_routes_accept_valid_token() {
        let tokens = Arc::new(TokenIssuer::new("descriptor-secret", 60));
        let token = tokens.issue("u1").unwrap();
        let app = router(tokens);
        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_entity_type() {
        let service = Arc::new(TodoService::new(Arc::new(InMemoryTodoStore::new())));
        let tokens = Arc::new(TokenIssuer::new("descriptor-secret", 60));
        assert_eq!(
            TodoDescriptor::new(service, AuthState::jwt(tokens)).entity_type(),
            "todo"
        );
    }
}
