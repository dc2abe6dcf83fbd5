use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;

/// Application configuration for identity-service.
///
/// Built once at startup and handed to service constructors; never mutated afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub password_reset: PasswordResetConfig,
    pub redis: RedisConfig,
    pub mail: MailConfig,
}

/// Session token signing configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "JwtConfig::default_expiration_hours")]
    pub expiration_hours: i64,
}

impl JwtConfig {
    fn default_expiration_hours() -> i64 {
        7 * 24
    }

    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

/// Failed-login throttling configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ThrottleConfig {
    #[serde(default = "ThrottleConfig::default_max_attempts")]
    pub max_attempts: i64,
    #[serde(default = "ThrottleConfig::default_window_minutes")]
    pub window_minutes: u64,
}

impl ThrottleConfig {
    fn default_max_attempts() -> i64 {
        5
    }

    fn default_window_minutes() -> u64 {
        60
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_minutes * 60)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            window_minutes: Self::default_window_minutes(),
        }
    }
}

/// Password reset token configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordResetConfig {
    #[serde(default = "PasswordResetConfig::default_token_length")]
    pub token_length: usize,
    #[serde(default = "PasswordResetConfig::default_lifetime_minutes")]
    pub lifetime_minutes: i64,
}

impl PasswordResetConfig {
    fn default_token_length() -> usize {
        10
    }

    fn default_lifetime_minutes() -> i64 {
        5
    }

    pub fn lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.lifetime_minutes)
    }
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            token_length: Self::default_token_length(),
            lifetime_minutes: Self::default_lifetime_minutes(),
        }
    }
}

/// Redis cache configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "RedisConfig::default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl RedisConfig {
    fn default_operation_timeout_ms() -> u64 {
        2000
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

/// Outbound mail configuration.
///
/// `workers` tasks drain a queue holding at most `queue_capacity` messages.
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub from: String,
    #[serde(default = "MailConfig::default_workers")]
    pub workers: usize,
    #[serde(default = "MailConfig::default_queue_capacity")]
    pub queue_capacity: usize,
}

impl MailConfig {
    fn default_workers() -> usize {
        2
    }

    fn default_queue_capacity() -> usize {
        128
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides.
    ///
    /// # Configuration Priority (highest to lowest)
    /// 1. Environment variables (JWT__SECRET, REDIS__URL, THROTTLE__MAX_ATTEMPTS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Returns error if required configuration values are missing or invalid
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(nested_environment())
            .build()?;

        configuration.try_deserialize()
    }
}

/// Environment source restricted to `SECTION__KEY` variables.
///
/// Plain variables such as `MAIL` or `PATH` would otherwise land on top-level
/// keys and clash with the config sections.
fn nested_environment() -> Environment {
    let variables = env::vars()
        .filter(|(key, _)| key.contains("__") && !key.starts_with('_'))
        .collect::<Map<String, String>>();

    Environment::default()
        .separator("__")
        .try_parsing(true)
        .source(Some(variables))
}
