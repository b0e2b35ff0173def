//! Validation pipeline
//!
//! Request bodies are checked against a declarative [`Schema`] before they
//! reach the handlers. Only declared fields survive into the typed input.

pub mod extractor;
pub mod schema;
pub mod validators;

pub use extractor::{Validated, ValidatedInput};
pub use schema::{Rule, Schema};
