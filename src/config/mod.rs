use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub cohort: CohortConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub session_cookie_name: String,
    pub secure_cookies: bool,
}

/// Cohort grouping knobs. Bucket boundaries and the comparison statistic are
/// configuration, not code: product owns the bracket table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortConfig {
    /// Lower bound (inclusive) of each age bucket above "under 13", ascending.
    pub bucket_lower_bounds: Vec<i32>,
    /// Statistic reported to users: "percentile" or "average".
    pub comparison_statistic: String,
    /// Queue depth for pending cohort recompute jobs.
    pub recompute_queue_depth: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, then specific env var overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("COHORT_COMPARISON_STATISTIC") {
            self.cohort.comparison_statistic = v;
        }
        if let Ok(v) = env::var("COHORT_RECOMPUTE_QUEUE_DEPTH") {
            self.cohort.recompute_queue_depth =
                v.parse().unwrap_or(self.cohort.recompute_queue_depth);
        }
        self
    }

    fn base_cohort() -> CohortConfig {
        CohortConfig {
            bucket_lower_bounds: vec![13, 18, 25, 35, 50],
            comparison_statistic: "percentile".to_string(),
            recompute_queue_depth: 256,
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/life_leveling_dev".to_string(),
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-do-not-use-in-production".to_string(),
                jwt_expiry_hours: 24 * 7,
                session_cookie_name: "ll_session".to_string(),
                secure_cookies: false,
            },
            cohort: Self::base_cohort(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/life_leveling_staging".to_string(),
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                session_cookie_name: "ll_session".to_string(),
                secure_cookies: true,
            },
            cohort: Self::base_cohort(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "postgres://localhost:5432/life_leveling".to_string(),
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                session_cookie_name: "ll_session".to_string(),
                secure_cookies: true,
            },
            cohort: Self::base_cohort(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert!(!config.is_production());
        assert!(!config.security.secure_cookies);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_defaults() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert!(config.security.secure_cookies);
        // Secret must come from the environment in production
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn cohort_bounds_ascending() {
        let config = AppConfig::development();
        let bounds = &config.cohort.bucket_lower_bounds;
        for pair in bounds.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
