//! Authentication Handlers
//!
//! Registration and login endpoints.

use crate::error::ApiError;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse};
use crate::AppState;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// POST /api/v1/auth/register
///
/// Create a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered"));
    }

    let password_hash = state.credentials.hash(&req.password)?;
    let user = state
        .users
        .insert(&req.email, &password_hash, &req.name)
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "user": user
        })),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate and return a bearer token
///
/// Both "no such email" and "wrong password" produce the same generic
/// response so the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !state.credentials.verify(&req.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;

    Ok(Json(TokenResponse { token }))
}
