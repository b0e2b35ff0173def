//! Todo CRUD over a [`TodoStore`]

use std::sync::Arc;

use crate::core::error::{EntityError, ServiceResult};
use crate::core::store::TodoStore;

use super::model::{CreateTodoInput, NewTodo, Todo, UpdateTodoInput};

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Create a todo owned by `owner_uuid`
    pub async fn create(&self, owner_uuid: &str, input: CreateTodoInput) -> ServiceResult<Todo> {
        let todo = self
            .store
            .insert(NewTodo {
                content: input.content,
                owner_uuid: owner_uuid.to_string(),
            })
            .await?;
        tracing::debug!(todo_id = todo.id, owner = owner_uuid, "todo created");
        Ok(todo)
    }

    pub async fn list_for_owner(&self, owner_uuid: &str) -> ServiceResult<Vec<Todo>> {
        Ok(self.store.list_by_owner(owner_uuid).await?)
    }

    pub async fn find(&self, id: i64) -> ServiceResult<Option<Todo>> {
        Ok(self.store.get(id).await?)
    }

    /// Load, merge the present fields, persist
    pub async fn update(&self, id: i64, patch: UpdateTodoInput) -> ServiceResult<Todo> {
        let mut todo = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| EntityError::todo_not_found(id))?;
        todo.apply(patch);
        Ok(self.store.save(&todo).await?)
    }

    /// Whether a row was removed
    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.store.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ServiceError;
    use crate::storage::InMemoryTodoStore;

    fn service() -> TodoService {
        TodoService::new(Arc::new(InMemoryTodoStore::new()))
    }

    fn input(content: &str) -> CreateTodoInput {
        CreateTodoInput {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_scopes_to_owner() {
        let service = service();
        let todo = service.create("u1", input("first")).await.unwrap();
        assert_eq!(todo.owner_uuid, "u1");
        assert_eq!(todo.content, "first");
        assert_eq!(service.find(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn test_list_only_returns_owned() {
        let service = service();
        service.create("u1", input("a")).await.unwrap();
        service.create("u2", input("b")).await.unwrap();
        service.create("u1", input("c")).await.unwrap();

        let mine = service.list_for_owner("u1").await.unwrap();
        let contents: Vec<_> = mine.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
        assert!(service.list_for_owner("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_changes_only_content() {
        let service = service();
        let todo = service.create("u1", input("old")).await.unwrap();
        let updated = service
            .update(
                todo.id,
                UpdateTodoInput {
                    content: Some("x".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, "x");
        assert_eq!(updated.uuid, todo.uuid);
        assert_eq!(updated.owner_uuid, todo.owner_uuid);
        assert_eq!(service.find(todo.id).await.unwrap().unwrap().content, "x");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = service()
            .update(42, UpdateTodoInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Entity(EntityError::NotFound { id: 42, .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = service();
        let todo = service.create("u1", input("gone")).await.unwrap();
        assert!(service.delete(todo.id).await.unwrap());
        assert!(!service.delete(todo.id).await.unwrap());
        assert!(service.find(todo.id).await.unwrap().is_none());
    }
}
