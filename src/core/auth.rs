//! Authentication gate for protected routes
//!
//! A request passes through three checks, stopping at the first failure:
//! the `Authorization` header must be present, it must carry a token after
//! the scheme word, and the token must verify. On success the verified
//! [`Identity`] is stored in the request extensions for handlers to extract.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::core::error::{AuthError, ServiceError};
use crate::core::token::TokenIssuer;

/// The verified subject of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_uuid: String,
}

impl Identity {
    pub fn new(subject_uuid: impl Into<String>) -> Self {
        Self {
            subject_uuid: subject_uuid.into(),
        }
    }
}

/// Pull the token segment out of the `Authorization` header
///
/// The header is split on whitespace and the second segment is the token.
/// The scheme word itself is not checked.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::NoToken)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedToken)?;
    if value.trim().is_empty() {
        return Err(AuthError::NoToken);
    }
    value
        .split_whitespace()
        .nth(1)
        .ok_or(AuthError::MalformedToken)
}

/// Source of identities for incoming requests
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError>;
}

/// Verifies JWTs issued by the user service
#[derive(Debug, Clone)]
pub struct JwtAuthProvider {
    tokens: Arc<TokenIssuer>,
}

impl JwtAuthProvider {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = extract_bearer(headers)?;
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejecting token");
            AuthError::InvalidToken
        })?;
        Ok(Identity::new(claims.uuid))
    }
}

/// Shared state for [`require_auth`]
#[derive(Clone)]
pub struct AuthState {
    pub provider: Arc<dyn AuthProvider>,
}

impl AuthState {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub fn jwt(tokens: Arc<TokenIssuer>) -> Self {
        Self::new(Arc::new(JwtAuthProvider::new(tokens)))
    }
}

/// Middleware: reject unauthenticated requests with 401, otherwise bind the identity
pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let identity = state.provider.authenticate(req.headers()).await?;
    tracing::debug!(subject = %identity.subject_uuid, "request authenticated");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AuthError::NoToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    fn provider() -> (JwtAuthProvider, Arc<TokenIssuer>) {
        let tokens = Arc::new(TokenIssuer::new("gate-secret", 3600));
        (JwtAuthProvider::new(tokens.clone()), tokens)
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(AuthError::NoToken));
    }

    #[test]
    fn test_extract_bearer_scheme_only() {
        assert_eq!(
            extract_bearer(&headers("Bearer")),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_extract_bearer_second_segment() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Ok("abc.def"));
        assert_eq!(extract_bearer(&headers("Token abc.def")), Ok("abc.def"));
    }

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let (provider, tokens) = provider();
        let token = tokens.issue("user-1").unwrap();
        let identity = provider
            .authenticate(&headers(&format!("Bearer {token}")))
            .await
            .unwrap();
        assert_eq!(identity, Identity::new("user-1"));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let (provider, _) = provider();
        let err = provider
            .authenticate(&headers("Bearer not-a-token"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_authenticate_foreign_signature() {
        let (provider, _) = provider();
        let foreign = TokenIssuer::new("other-secret", 3600).issue("user-1").unwrap();
        let err = provider
            .authenticate(&headers(&format!("Bearer {foreign}")))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }
}
