//! Authorization Policy
//!
//! The single ownership check used by every event and attendee operation.
//! Handlers verify that a resource exists before calling this, so a missing
//! resource is reported as 404 rather than leaking through a 403.

use crate::error::ApiError;

/// Allow the operation only when the actor owns the resource
pub fn require_owner(actor_id: i64, owner_id: i64) -> Result<(), ApiError> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_allowed() {
        assert!(require_owner(1, 1).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        assert!(matches!(require_owner(2, 1), Err(ApiError::Forbidden)));
    }
}
