//! External representations of entities
//!
//! Resources are what leaves the service. Password hashes and owner
//! references never appear in them.

use serde::Serialize;
use uuid::Uuid;

use crate::entities::todo::Todo;
use crate::entities::user::User;

/// Maps an entity to its client-facing view
pub trait ToResource {
    type Resource: Serialize;

    fn to_resource(&self) -> Self::Resource;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResource {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoResource {
    pub id: i64,
    pub uuid: Uuid,
    pub content: String,
}

impl ToResource for User {
    type Resource = UserResource;

    fn to_resource(&self) -> UserResource {
        UserResource {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

impl ToResource for Todo {
    type Resource = TodoResource;

    fn to_resource(&self) -> TodoResource {
        TodoResource {
            id: self.id,
            uuid: self.uuid,
            content: self.content.clone(),
        }
    }
}

/// Transform a whole collection, keeping order
pub fn collection<T: ToResource>(items: &[T]) -> Vec<T::Resource> {
    items.iter().map(ToResource::to_resource).collect()
}
