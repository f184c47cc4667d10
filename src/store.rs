//! Data Access Layer
//!
//! Persistence operations for users, events and attendees. Every operation
//! runs under a bounded timeout so a stalled database never blocks a
//! serving task indefinitely.

use crate::error::ApiError;
use crate::models::{Attendee, Event, EventInput, User};

use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;

/// Run a database future under the store's timeout. Expiry is surfaced as
/// `ApiError::Timeout`; if the request was aborted the dropped future
/// cancels the in-flight query with it.
async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout),
    }
}

// ============================================
// Users
// ============================================

/// Partial user update; `None` leaves a column untouched. The outer
/// `Option` on `profile_picture` distinguishes "leave alone" from
/// "set/clear".
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub profile_picture: Option<Option<String>>,
}

#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
    timeout: Duration,
}

impl UserStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn insert(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (email, password_hash, name)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(email)
            .bind(password_hash)
            .bind(name)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Apply a partial profile update and return the fresh row
    pub async fn update(&self, id: i64, changes: UserChanges) -> Result<User, ApiError> {
        let set_picture = changes.profile_picture.is_some();
        let picture = changes.profile_picture.flatten();

        let updated = bounded(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users SET
                    name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    password_hash = COALESCE($4, password_hash),
                    profile_picture = CASE WHEN $5 THEN $6 ELSE profile_picture END,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(changes.name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(set_picture)
            .bind(picture)
            .fetch_optional(&self.pool),
        )
        .await?;

        updated.ok_or(ApiError::NotFound("user"))
    }

    /// Delete a user together with every row that references them, in one
    /// transaction: attendee registrations (their own and those on their
    /// events), their events, then the user row. If the user row turns out
    /// to be gone already the whole cascade is rolled back, so a concurrent
    /// duplicate delete can never destroy events without removing a user.
    pub async fn delete_cascade(&self, id: i64) -> Result<(), ApiError> {
        let deleted = bounded(self.timeout, async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                DELETE FROM attendees
                WHERE user_id = $1
                   OR event_id IN (SELECT id FROM events WHERE owner_id = $1)
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM events WHERE owner_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }

            tx.commit().await?;
            Ok(true)
        })
        .await?;

        if !deleted {
            return Err(ApiError::NotFound("user"));
        }

        Ok(())
    }
}

// ============================================
// Events
// ============================================

#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
    timeout: Duration,
}

impl EventStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Insert an event owned by `owner_id` regardless of anything the
    /// client may have claimed.
    pub async fn insert(&self, owner_id: i64, input: &EventInput) -> Result<Event, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                INSERT INTO events (owner_id, name, description, date, location)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.location)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn list(&self) -> Result<Vec<Event>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY date")
                .fetch_all(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    /// Replace the mutable fields of an event. The owner column is never
    /// touched here.
    pub async fn update(&self, id: i64, input: &EventInput) -> Result<Event, ApiError> {
        let updated = bounded(
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                UPDATE events
                SET name = $2, description = $3, date = $4, location = $5
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.location)
            .fetch_optional(&self.pool),
        )
        .await?;

        updated.ok_or(ApiError::NotFound("event"))
    }

    /// Delete an event and its attendee rows in one transaction
    pub async fn delete_cascade(&self, id: i64) -> Result<(), ApiError> {
        let deleted = bounded(self.timeout, async {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM attendees WHERE event_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            let result = sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }

            tx.commit().await?;
            Ok(true)
        })
        .await?;

        if !deleted {
            return Err(ApiError::NotFound("event"));
        }

        Ok(())
    }
}

// ============================================
// Attendees
// ============================================

#[derive(Clone)]
pub struct AttendeeStore {
    pool: PgPool,
    timeout: Duration,
}

impl AttendeeStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub async fn insert(&self, event_id: i64, user_id: i64) -> Result<Attendee, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Attendee>(
                r#"
                INSERT INTO attendees (event_id, user_id)
                VALUES ($1, $2)
                RETURNING *
                "#,
            )
            .bind(event_id)
            .bind(user_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn find(&self, event_id: i64, user_id: i64) -> Result<Option<Attendee>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Attendee>(
                "SELECT * FROM attendees WHERE event_id = $1 AND user_id = $2",
            )
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Remove one registration; returns how many rows were deleted
    pub async fn delete(&self, event_id: i64, user_id: i64) -> Result<u64, ApiError> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM attendees WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    /// Users registered for an event
    pub async fn users_for_event(&self, event_id: i64) -> Result<Vec<User>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT u.*
                FROM users u
                JOIN attendees a ON a.user_id = u.id
                WHERE a.event_id = $1
                ORDER BY u.id
                "#,
            )
            .bind(event_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    /// Events a user is registered for
    pub async fn events_for_user(&self, user_id: i64) -> Result<Vec<Event>, ApiError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                SELECT e.*
                FROM events e
                JOIN attendees a ON a.event_id = e.id
                WHERE a.user_id = $1
                ORDER BY e.date
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
