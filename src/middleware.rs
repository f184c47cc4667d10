//! Authentication Middleware
//!
//! Validates the bearer token on every protected request and resolves the
//! current user before any handler logic runs.

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::AppState;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Require an authenticated user
///
/// Extracts the `Authorization: Bearer <token>` header, validates the
/// token, then looks the user up so that a token for a deleted account is
/// rejected immediately even though its signature is still valid. The
/// resolved user is stored in request extensions for the [`CurrentUser`]
/// extractor.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = bearer_token(header)?;
    let user_id = state.tokens.validate(token)?;

    // One lookup per request, no caching. "Deleted after issuance" and
    // "never existed" must be indistinguishable to the caller.
    let user = match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) | Err(_) => return Err(ApiError::Unauthenticated),
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Pull the token out of an `Authorization` header value. A header without
/// the `Bearer ` scheme is rejected, including a bare token.
fn bearer_token(header: Option<&str>) -> Result<&str, ApiError> {
    let header = header.ok_or(ApiError::Unauthenticated)?;
    header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_header_rejected() {
        assert!(bearer_token(None).is_err());
    }

    #[test]
    fn test_bare_token_rejected() {
        assert!(bearer_token(Some("eyJhbGciOi.token.here")).is_err());
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        assert!(bearer_token(Some("Basic dXNlcjpwYXNz")).is_err());
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(
            bearer_token(Some("Bearer eyJhbGciOi.token.here")).unwrap(),
            "eyJhbGciOi.token.here"
        );
    }
}
