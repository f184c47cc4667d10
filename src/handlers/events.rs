//! Event and Attendee Handlers
//!
//! Mutating operations check existence first, then ownership, so a missing
//! resource is always reported as 404 and never leaks through a 403.

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::models::EventInput;
use crate::policy::require_owner;
use crate::AppState;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// POST /api/v1/events
///
/// The owner is always the authenticated caller; any owner the client
/// supplies is ignored.
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<EventInput>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let event = state.events.insert(user.id, &req).await?;

    tracing::info!(event_id = event.id, owner_id = user.id, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/events
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

/// GET /api/v1/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;

    Ok(Json(event))
}

/// PUT /api/v1/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<EventInput>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let existing = state
        .events
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    require_owner(user.id, existing.owner_id)?;

    let updated = state.events.update(id, &req).await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let existing = state
        .events
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    require_owner(user.id, existing.owner_id)?;

    state.events.delete_cascade(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/events/:id/attendees
///
/// Only the owner may inspect the roster.
pub async fn list_attendees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    require_owner(user.id, event.owner_id)?;

    let attendees = state.attendees.users_for_event(id).await?;

    Ok(Json(attendees))
}

/// POST /api/v1/events/:id/attendees/:user_id
///
/// Register a user for an event. Registering the same user twice is a
/// conflict, not a silent no-op.
pub async fn add_attendee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    require_owner(user.id, event.owner_id)?;

    if state.users.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::NotFound("user"));
    }

    if state.attendees.find(event_id, user_id).await?.is_some() {
        return Err(ApiError::Conflict("User is already an attendee"));
    }

    let attendee = state.attendees.insert(event_id, user_id).await?;

    Ok((StatusCode::CREATED, Json(attendee)))
}

/// DELETE /api/v1/events/:id/attendees/:user_id
pub async fn remove_attendee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((event_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .events
        .find_by_id(event_id)
        .await?
        .ok_or(ApiError::NotFound("event"))?;
    require_owner(user.id, event.owner_id)?;

    let removed = state.attendees.delete(event_id, user_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound("attendee"));
    }

    Ok(StatusCode::NO_CONTENT)
}
