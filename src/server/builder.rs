//! ServerBuilder for assembling and serving one service

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use crate::config::ServiceKind;
use crate::core::error::ConfigError;
use anyhow::Result;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for a service router with health routes, tracing and optional CORS
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new(ServiceKind::Todo)
///     .register(TodoDescriptor::new(service, auth))
///     .serve("0.0.0.0:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    kind: ServiceKind,
    entity_registry: EntityRegistry,
    cors_origin: Option<String>,
}

impl ServerBuilder {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            entity_registry: EntityRegistry::new(),
            cors_origin: None,
        }
    }

    /// Register an entity's routes
    pub fn register(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Allow one browser origin, with credentials
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router, ConfigError> {
        tracing::debug!(
            service = self.kind.name(),
            entities = ?self.entity_registry.entity_types(),
            "building routes"
        );
        let mut app = health_routes(self.kind).merge(self.entity_registry.build_routes());

        if let Some(origin) = &self.cors_origin {
            app = app.layer(cors_layer(origin)?);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let service = self.kind.name();
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(service, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(service, "Server shutdown complete");
        Ok(())
    }
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
        field: "cors_origin".to_string(),
        value: origin.to_string(),
        message: e.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

fn health_routes(kind: ServiceKind) -> Router {
    let service = kind.name();
    Router::new()
        .route(
            "/check",
            get(move || async move { format!("Hello from {}!", service) }),
        )
        .route(
            "/health",
            get(move || async move { health_check(service) }),
        )
}

fn health_check(service: &str) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": service
    }))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
