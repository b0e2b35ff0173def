//! Todos: per-user CRUD behind the authentication gate

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::TodoDescriptor;
pub use handlers::TodoState;
pub use model::{CreateTodoInput, NewTodo, Todo, UpdateTodoInput};
pub use service::TodoService;
