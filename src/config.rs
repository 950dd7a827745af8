//! Runtime configuration, read from the environment (and `.env` via `dotenv`).

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_PAYMENT_DELAY_MS: u64 = 2000;

/// Which [`crate::db::Store`] backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    MongoDb,
    /// In-process store seeded with the sample routes. Handy for local runs.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    /// Shared HS256 secret of the hosted auth provider.
    pub jwt_secret: String,
    /// Expected `aud` claim. Audience is not checked when unset.
    pub jwt_audience: Option<String>,
    pub payment_delay: Duration,
    pub cors_origin: Option<String>,
    pub store: StoreKind,
    pub force_seed: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            Err(_) => 8080,
        };

        let payment_delay_ms = match env::var("PAYMENT_DELAY_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PAYMENT_DELAY_MS", value: raw })?,
            Err(_) => DEFAULT_PAYMENT_DELAY_MS,
        };

        let store = match env::var("STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            Ok("mongodb") | Err(_) => StoreKind::MongoDb,
            Ok(other) => {
                return Err(ConfigError::Invalid { name: "STORE", value: other.to_string() })
            }
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "route_rider".to_string()),
            jwt_secret,
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
            payment_delay: Duration::from_millis(payment_delay_ms),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|s| !s.is_empty()),
            store,
            force_seed: env::var("FORCE_SEED").unwrap_or_else(|_| "false".to_string()) == "true",
        })
    }

    /// Configuration for tests and local experiments: in-memory store, no payment delay.
    pub fn for_testing(jwt_secret: &str) -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            mongodb_uri: String::new(),
            database_name: String::new(),
            jwt_secret: jwt_secret.to_string(),
            jwt_audience: None,
            payment_delay: Duration::ZERO,
            cors_origin: None,
            store: StoreKind::Memory,
            force_seed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // env is process-global; keep these tests from interleaving.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in ["JWT_SECRET", "PORT", "PAYMENT_DELAY_MS", "STORE", "FORCE_SEED", "JWT_AUDIENCE"] {
            env::remove_var(key);
        }
    }

    #[test]
    fn missing_secret_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("JWT_SECRET", "shh");
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.payment_delay, Duration::from_millis(2000));
        assert_eq!(config.store, StoreKind::MongoDb);
        assert!(!config.force_seed);
        assert!(config.jwt_audience.is_none());
        clear_env();
    }

    #[test]
    fn parses_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("JWT_SECRET", "shh");
        env::set_var("PORT", "9000");
        env::set_var("PAYMENT_DELAY_MS", "0");
        env::set_var("STORE", "memory");
        env::set_var("FORCE_SEED", "true");
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.payment_delay, Duration::ZERO);
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.force_seed);
        clear_env();
    }

    #[test]
    fn rejects_unknown_store() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("JWT_SECRET", "shh");
        env::set_var("STORE", "postgres");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "STORE", .. }));
        clear_env();
    }
}
