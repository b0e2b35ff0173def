//! Axum extractor for validated request bodies
//!
//! This module provides the `Validated<T>` extractor that runs a request body
//! through the input type's [`Schema`] before the handler sees it.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::schema::Schema;
use crate::core::error::{ServiceError, ValidationError};

/// Input types that declare their validation schema
pub trait ValidatedInput: DeserializeOwned {
    fn schema() -> Schema;
}

/// Axum extractor yielding a typed, validated input
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_todo(
///     Validated(input): Validated<CreateTodoInput>,
/// ) -> ServiceResult<impl IntoResponse> {
///     // input only holds the declared fields
/// }
/// ```
///
/// An empty body is validated as `{}`, so missing required fields are
/// reported as field errors rather than a JSON parse error. A non-empty body
/// must be declared as `application/json`.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

/// Whether the request declares a JSON body (`application/json` or `+json`)
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Parse a raw body into JSON, mapping an empty body to `null`
///
/// Bodyless requests carry no content type, so only a non-empty body has to
/// be declared as JSON.
pub fn parse_body(bytes: &[u8], json_content: bool) -> Result<Value, ValidationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    if !json_content {
        return Err(ValidationError::UnsupportedMediaType);
    }
    serde_json::from_slice(bytes).map_err(|e| ValidationError::InvalidJson {
        message: e.to_string(),
    })
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedInput + Send,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json_content = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ValidationError::InvalidJson {
                message: e.body_text(),
            }
        })?;
        let payload = parse_body(&bytes, json_content)?;
        let input = T::schema().validate_into(&payload)?;
        Ok(Validated(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::Rule;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Note {
        text: String,
    }

    impl ValidatedInput for Note {
        fn schema() -> Schema {
            Schema::new().field("text", [Rule::RequiredString])
        }
    }

    fn request(body: &'static str) -> Request {
        request_with_type(body, "application/json")
    }

    fn request_with_type(body: &'static str, content_type: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let Validated(note) = Validated::<Note>::from_request(request(r#"{"text":"hi"}"#), &())
            .await
            .unwrap();
        assert_eq!(note.text, "hi");
    }

    #[tokio::test]
    async fn test_empty_body_reports_field_errors() {
        let err = Validated::<Note>::from_request(request(""), &())
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(ValidationError::FieldErrors(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "text");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_invalid_json() {
        let err = Validated::<Note>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidJson { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_json_content_type_is_rejected() {
        let err = Validated::<Note>::from_request(
            request_with_type(r#"{"text":"hi"}"#, "text/plain"),
            &(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UnsupportedMediaType)
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_missing_content_type_with_body_is_rejected() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"text":"hi"}"#))
            .unwrap();
        let err = Validated::<Note>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_json_suffix_and_charset_are_accepted() {
        for content_type in ["application/json; charset=utf-8", "application/merge-patch+json"] {
            let Validated(note) =
                Validated::<Note>::from_request(request_with_type(r#"{"text":"ok"}"#, content_type), &())
                    .await
                    .unwrap();
            assert_eq!(note.text, "ok");
        }
    }

    #[test]
    fn test_parse_body_whitespace_is_null() {
        assert_eq!(parse_body(b"  \n", false).unwrap(), Value::Null);
    }
}
