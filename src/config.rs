use crate::error::app_error::AppError;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    /// Seconds of no observed interaction before a live session is ended.
    pub inactivity_ceiling_seconds: u64,
    /// Period of the expiry watchdog check.
    pub watchdog_period_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Where the session record is persisted between process lifetimes.
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_ceiling_seconds: 30 * 60,
            watchdog_period_seconds: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: ".turnstile-session.json".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SessionConfig {
    pub fn inactivity_ceiling(&self) -> Duration {
        Duration::from_secs(self.inactivity_ceiling_seconds)
    }

    pub fn watchdog_period(&self) -> Duration {
        Duration::from_secs(self.watchdog_period_seconds.max(1))
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Turnstile.toml (base configuration file)
    /// 2. Environment variables (prefixed with TURNSTILE_, sections split
    ///    with a double underscore, e.g. TURNSTILE_SESSION__WATCHDOG_PERIOD_SECONDS)
    pub fn load() -> Result<Self, AppError> {
        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            // Layer on Turnstile.toml if it exists
            .merge(Toml::file("Turnstile.toml").nested())
            .merge(Env::prefixed("TURNSTILE_").split("__"));

        Ok(figment.extract()?)
    }
}
