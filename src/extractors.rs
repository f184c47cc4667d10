//! Request Extractors
//!
//! Typed access to the identity resolved by the authentication middleware.

use crate::error::ApiError;
use crate::models::User;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// The authenticated user for the current request
///
/// Placed into request extensions by [`crate::middleware::require_auth`].
/// If the value is absent the route was not wired through the middleware;
/// that is a hard error, never a zero-valued user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
