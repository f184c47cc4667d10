//! EventHub API
//!
//! REST backend for an events/attendees application: users register and
//! log in, create events, and manage attendee rosters. Protected routes
//! are guarded by JWT bearer authentication and per-resource ownership
//! checks; account deletion cascades transactionally over events and
//! attendee rows.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod store;
pub mod token;

pub use config::AppConfig;
pub use error::ApiError;
pub use extractors::CurrentUser;

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use password::CredentialStore;
use store::{AttendeeStore, EventStore, UserStore};
use token::TokenService;

/// Shared application state, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub events: EventStore,
    pub attendees: AttendeeStore,
    pub tokens: TokenService,
    pub credentials: CredentialStore,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Self {
        let timeout = Duration::from_secs(config.db_timeout_secs);

        Self {
            users: UserStore::new(pool.clone(), timeout),
            events: EventStore::new(pool.clone(), timeout),
            attendees: AttendeeStore::new(pool, timeout),
            tokens: TokenService::new(&config.jwt_secret, config.token_ttl_hours),
            credentials: CredentialStore::new(
                config.argon2_memory_cost,
                config.argon2_time_cost,
                config.argon2_parallelism,
            ),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/users/:id", get(handlers::users::get_user))
        .route("/users/:id/events", get(handlers::users::events_attending))
        .route("/events", get(handlers::events::list_events))
        .route("/events/:id", get(handlers::events::get_event));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route(
            "/auth/me",
            get(handlers::users::current_user)
                .put(handlers::users::update_current_user)
                .delete(handlers::users::delete_current_user),
        )
        .route("/events", post(handlers::events::create_event))
        .route(
            "/events/:id",
            axum::routing::put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/events/:id/attendees",
            get(handlers::events::list_attendees),
        )
        .route(
            "/events/:id/attendees/:user_id",
            post(handlers::events::add_attendee).delete(handlers::events::remove_attendee),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
