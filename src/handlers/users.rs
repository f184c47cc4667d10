//! User Handlers
//!
//! Public user lookup plus self-service profile operations. Profile
//! operations act on the authenticated identity directly, so no separate
//! ownership lookup is needed.

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::models::UpdateProfileRequest;
use crate::store::UserChanges;
use crate::AppState;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(user))
}

/// GET /api/v1/users/:id/events
///
/// Events the given user is registered to attend
pub async fn events_attending(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if state.users.find_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound("user"));
    }

    let events = state.attendees.events_for_user(id).await?;

    Ok(Json(events))
}

/// GET /api/v1/auth/me
pub async fn current_user(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(user)
}

/// PUT /api/v1/auth/me
///
/// Update the caller's own profile; only fields present in the body are
/// touched. An empty profile_picture clears the stored value.
pub async fn update_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if let Some(email) = &req.email {
        match state.users.find_by_email(email).await? {
            Some(existing) if existing.id != user.id => {
                return Err(ApiError::Conflict("Email already registered"));
            }
            _ => {}
        }
    }

    let password_hash = match &req.password {
        Some(password) => Some(state.credentials.hash(password)?),
        None => None,
    };

    let changes = UserChanges {
        name: req.name,
        email: req.email,
        password_hash,
        profile_picture: req.profile_picture.map(|p| {
            let trimmed = p.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }),
    };

    let updated = state.users.update(user.id, changes).await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/auth/me
///
/// Remove the caller's account together with their events and every
/// attendee row referencing them, atomically.
pub async fn delete_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    state.users.delete_cascade(user.id).await?;

    tracing::info!(user_id = user.id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}
