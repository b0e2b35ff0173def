//! Entity modules: model, service, handlers and route descriptor per entity

pub mod todo;
pub mod user;
