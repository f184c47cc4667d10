//! Application Configuration
//!
//! All configuration values are loaded from environment variables once at
//! startup and passed explicitly to the components that need them.

use crate::error::ApiError;
use std::env;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on (from PORT env var)
    pub port: u16,

    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Bearer token validity window in hours (from TOKEN_TTL_HOURS env var)
    pub token_ttl_hours: i64,

    /// Per-operation database timeout in seconds (from DB_TIMEOUT_SECS env var)
    pub db_timeout_secs: u64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if JWT_SECRET or DATABASE_URL are not set
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL environment variable must be set"),

            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET environment variable must be set"),

            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(72),

            db_timeout_secs: env::var("DB_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.token_ttl_hours <= 0 {
            return Err(ApiError::Config(
                "TOKEN_TTL_HOURS must be positive".to_string(),
            ));
        }

        if self.db_timeout_secs == 0 {
            return Err(ApiError::Config(
                "DB_TIMEOUT_SECS must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            port: 8080,
            database_url: "postgres://localhost/eventhub".to_string(),
            jwt_secret: "a".repeat(32),
            token_ttl_hours: 72,
            db_timeout_secs: 3,
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_secret() {
        let mut config = test_config();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_ttl() {
        let mut config = test_config();
        config.token_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = test_config();
        config.db_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
