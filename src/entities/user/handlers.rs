//! HTTP handlers for `/register` and `/login`
//!
//! The user service answers with plain objects rather than the todo
//! envelope: `{message, user}` / `{message, token}` on success and
//! `{error}` (plus `errors` for field violations) on failure.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::error::{EntityError, ServiceError};
use crate::core::policy::UserPolicy;
use crate::core::resource::ToResource;
use crate::core::validation::Validated;
use crate::core::validation::extractor::{has_json_content_type, parse_body};

use super::model::{LoginInput, RegisterInput};
use super::service::UserService;

#[derive(Clone)]
pub struct UserState {
    pub service: Arc<UserService>,
}

/// Error rendered in the user service's `{error}` shape
#[derive(Debug)]
pub struct UserApiError(pub ServiceError);

impl From<ServiceError> for UserApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.0.error_code(), "request failed: {}", self.0);
        }
        let mut body = json!({ "error": self.0.message() });
        if let Some(details) = self.0.details() {
            body["errors"] = details;
        }
        (status, Json(body)).into_response()
    }
}

pub async fn register(
    State(state): State<UserState>,
    payload: Result<Validated<RegisterInput>, ServiceError>,
) -> Result<impl IntoResponse, UserApiError> {
    let Validated(input) = payload?;

    let available = UserPolicy::can_register(state.service.store(), &input.email)
        .await
        .map_err(ServiceError::from)?;
    if !available {
        return Err(ServiceError::from(EntityError::duplicate_email(input.email)).into());
    }

    let user = state.service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user.to_resource(),
        })),
    ))
}

pub async fn login(
    State(state): State<UserState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, UserApiError> {
    let payload =
        parse_body(&body, has_json_content_type(&headers)).map_err(ServiceError::from)?;
    let token = state.service.login(LoginInput::from_value(&payload)).await?;
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
    })))
}
