//! Ownership policies
//!
//! Pure predicates deciding whether a requester may act on an entity.
//! Callers check existence first, so "not found" and "not owned" stay distinct.

use crate::core::store::UserStore;
use crate::entities::todo::Todo;

pub struct TodoPolicy;

impl TodoPolicy {
    /// Anyone with a verified, non-empty identity may create
    pub fn can_create(requester_uuid: &str) -> bool {
        !requester_uuid.is_empty()
    }

    pub fn can_view(todo: &Todo, requester_uuid: &str) -> bool {
        Self::is_owner(todo, requester_uuid)
    }

    pub fn can_update(todo: &Todo, requester_uuid: &str) -> bool {
        Self::is_owner(todo, requester_uuid)
    }

    pub fn can_delete(todo: &Todo, requester_uuid: &str) -> bool {
        Self::is_owner(todo, requester_uuid)
    }

    fn is_owner(todo: &Todo, requester_uuid: &str) -> bool {
        todo.owner_uuid == requester_uuid
    }
}

pub struct UserPolicy;

impl UserPolicy {
    /// Registration is allowed only while the email is unused
    pub async fn can_register(store: &dyn UserStore, email: &str) -> anyhow::Result<bool> {
        Ok(store.find_by_email(email).await?.is_none())
    }
}
