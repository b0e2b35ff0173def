//! Entity registry for collecting per-entity routers

use axum::Router;
use std::collections::BTreeMap;

/// Describes how to build the routes for one entity
///
/// Descriptors own whatever state their handlers need, so the router they
/// return is already fully stated.
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g. "todo")
    fn entity_type(&self) -> &str;

    fn build_routes(&self) -> Router;
}

/// Registry for all entities served by one binary
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity descriptor, replacing any with the same type name
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge every registered entity's routes into one router
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, d| router.merge(d.build_routes()))
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}
