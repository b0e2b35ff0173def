//! Users: registration and login

pub mod descriptor;
pub mod handlers;
pub mod model;
pub mod service;

pub use descriptor::UserDescriptor;
pub use handlers::{UserApiError, UserState};
pub use model::{LoginInput, NewUser, RegisterInput, User};
pub use service::UserService;
