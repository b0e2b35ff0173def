//! HTTP handlers for the todo collection
//!
//! Every route sits behind the authentication gate. For single-todo routes
//! the order is lookup (404), ownership (403), then body validation (400).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::core::auth::Identity;
use crate::core::envelope::Envelope;
use crate::core::error::{AuthError, EntityError, ServiceError, ServiceResult};
use crate::core::policy::TodoPolicy;
use crate::core::resource::{ToResource, collection};
use crate::core::validation::Validated;

use super::model::{CreateTodoInput, Todo, UpdateTodoInput};
use super::service::TodoService;

#[derive(Clone)]
pub struct TodoState {
    pub service: Arc<TodoService>,
}

/// Path ids that are not integers can never match a row
fn parse_id(raw: &str) -> ServiceResult<i64> {
    raw.parse::<i64>().map_err(|_| {
        ServiceError::from(EntityError::NotFound {
            entity_type: "Todo".to_string(),
            id: 0,
        })
    })
}

async fn load(state: &TodoState, raw_id: &str) -> ServiceResult<Todo> {
    let id = parse_id(raw_id)?;
    state
        .service
        .find(id)
        .await?
        .ok_or_else(|| EntityError::todo_not_found(id).into())
}

pub async fn create_todo(
    State(state): State<TodoState>,
    identity: Identity,
    payload: Result<Validated<CreateTodoInput>, ServiceError>,
) -> ServiceResult<Response> {
    if !TodoPolicy::can_create(&identity.subject_uuid) {
        return Err(AuthError::Forbidden.into());
    }
    let Validated(input) = payload?;

    let todo = state.service.create(&identity.subject_uuid, input).await?;
    Ok(Envelope::success("Todo created successfully", todo.to_resource())
        .into_response_with(StatusCode::CREATED))
}

pub async fn list_todos(
    State(state): State<TodoState>,
    identity: Identity,
) -> ServiceResult<Response> {
    let todos = state.service.list_for_owner(&identity.subject_uuid).await?;
    Ok(Envelope::success("Todos fetched successfully", collection(&todos)).into_response())
}

pub async fn get_todo(
    State(state): State<TodoState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ServiceResult<Response> {
    let todo = load(&state, &id).await?;
    if !TodoPolicy::can_view(&todo, &identity.subject_uuid) {
        return Err(AuthError::Forbidden.into());
    }
    Ok(Envelope::success("Todo fetched successfully", todo.to_resource()).into_response())
}

pub async fn update_todo(
    State(state): State<TodoState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Validated<UpdateTodoInput>, ServiceError>,
) -> ServiceResult<Response> {
    let todo = load(&state, &id).await?;
    if !TodoPolicy::can_update(&todo, &identity.subject_uuid) {
        return Err(AuthError::Forbidden.into());
    }
    let Validated(patch) = payload?;

    let updated = state.service.update(todo.id, patch).await?;
    Ok(Envelope::success("Todo updated successfully", updated.to_resource()).into_response())
}

pub async fn delete_todo(
    State(state): State<TodoState>,
    identity: Identity,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    let todo = load(&state, &id).await?;
    if !TodoPolicy::can_delete(&todo, &identity.subject_uuid) {
        return Err(AuthError::Forbidden.into());
    }

    // Lost a race with another delete
    if !state.service.delete(todo.id).await? {
        return Err(EntityError::todo_not_found(todo.id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("17").unwrap(), 17);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Todo not found");
    }
}
