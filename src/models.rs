//! Data Models
//!
//! Database entities and request/response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateUrl, ValidationError};

// ============================================
// Database Entities
// ============================================

/// User entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    // Never serialized outward, so the hash cannot leak through a response.
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event entity from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "ownerId")]
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

/// Attendee join entity: one user's registration to one event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    #[serde(rename = "eventId")]
    pub event_id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

// ============================================
// Request DTOs
// ============================================

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Event create/update payload. Updates replace every mutable field; the
/// owner is never taken from the client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    /// RFC 3339 timestamp; anything else is rejected at the boundary.
    pub date: DateTime<Utc>,

    #[validate(length(min = 3, message = "Location must be at least 3 characters"))]
    pub location: String,
}

/// Self-service profile update. Every field is optional so a client can
/// send only what changed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// An empty string clears the stored picture; anything else must be
    /// a URL.
    #[validate(custom(
        function = validate_profile_picture,
        message = "Profile picture must be a URL"
    ))]
    pub profile_picture: Option<String>,
}

fn validate_profile_picture(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

// ============================================
// Response DTOs
// ============================================

/// Login response carrying the bearer token
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "alice@x.com".to_string(),
            name: "Alice".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            profile_picture: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice@x.com"));
    }

    #[test]
    fn test_event_wire_field_names() {
        let event = Event {
            id: 7,
            owner_id: 1,
            name: "Meetup".to_string(),
            description: "Team sync meeting".to_string(),
            date: "2026-05-20T10:00:00Z".parse().unwrap(),
            location: "HQ".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["ownerId"], 1);
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_event_input_rejects_malformed_date() {
        let raw = r#"{"name":"Meetup","description":"Team sync meeting","date":"20-05-2026","location":"HQ"}"#;
        assert!(serde_json::from_str::<EventInput>(raw).is_err());
    }

    #[test]
    fn test_event_input_accepts_rfc3339_date() {
        let raw = r#"{"name":"Meetup","description":"Team sync meeting","date":"2026-05-20T10:00:00Z","location":"HQ"}"#;
        let input: EventInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.location, "HQ");
    }

    #[test]
    fn test_profile_picture_must_be_a_url() {
        let base = UpdateProfileRequest {
            name: None,
            email: None,
            password: None,
            profile_picture: None,
        };
        assert!(base.validate().is_ok());

        let with_url = UpdateProfileRequest {
            profile_picture: Some("https://cdn.x.com/avatar_1.png".to_string()),
            ..base.clone()
        };
        assert!(with_url.validate().is_ok());

        // Empty string is the "clear the picture" sentinel, not a URL.
        let clearing = UpdateProfileRequest {
            profile_picture: Some("".to_string()),
            ..base.clone()
        };
        assert!(clearing.validate().is_ok());

        let junk = UpdateProfileRequest {
            profile_picture: Some("not a url".to_string()),
            ..base
        };
        assert!(junk.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "alice@x.com".to_string(),
            password: "password123".to_string(),
            name: "Alice".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            password: "pw".to_string(),
            ..ok.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }
}
