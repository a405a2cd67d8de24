//! Request extractors.

use std::str::FromStr;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use stockflow_shared::types::UserId;

use crate::error::ApiError;

/// Header carrying the caller's identity. Authentication happens upstream.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the user performing a mutating request.
///
/// ```ignore
/// async fn handler(Actor(user): Actor) -> impl IntoResponse {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub UserId);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("X-User-Id header is required"))?;

        value
            .to_str()
            .ok()
            .and_then(|raw| UserId::from_str(raw.trim()).ok())
            .map(Actor)
            .ok_or_else(|| ApiError::unauthorized("X-User-Id header must be a UUID"))
    }
}

/// JSON request body whose rejections render as [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(header: Option<&str>) -> Result<Actor, ApiError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Actor::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_header() {
        let user = UserId::new();
        let actor = extract(Some(&user.to_string())).await.unwrap();
        assert_eq!(actor, Actor(user));
    }

    #[tokio::test]
    async fn test_missing_header() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let err = extract(Some("not-a-uuid")).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
