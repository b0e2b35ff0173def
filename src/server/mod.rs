//! Server assembly: entity registry, builder with health routes, tracing setup

pub mod builder;
pub mod entity_registry;
pub mod telemetry;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use telemetry::init_tracing;
