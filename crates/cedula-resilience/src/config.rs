//! Retry configuration and environment classification.
//!
//! Configuration is supplied once at startup and read-only thereafter.
//! Defaults match the downstream provider's documented limits; override via
//! builder methods, serde (all fields defaulted), or environment variables:
//!
//! - `CEDULA_RETRY_MAX_ATTEMPTS` (default: 3, minimum 1)
//! - `CEDULA_RETRY_INITIAL_DELAY_MS` (default: 2000)
//! - `CEDULA_RETRY_ENABLED` (default: true)
//! - `CEDULA_ENVIRONMENT` (default: local)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Coarse deployment environment label.
///
/// `local`, `dev`, and `test` classify as low-volume: their rate tables are
/// not the production ones, so server-advertised delays are ignored there.
/// Any unrecognized label classifies as [`Environment::Production`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer workstation.
    #[default]
    Local,
    /// Shared development deployment.
    Dev,
    /// Automated test deployment.
    Test,
    /// Pre-production staging.
    Staging,
    /// Production or production-like.
    Production,
}

impl Environment {
    /// Classify a free-form environment string. Unknown values are treated
    /// as production-like, the conservative choice.
    pub fn classify(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "dev" => Self::Dev,
            "test" => Self::Test,
            "staging" => Self::Staging,
            _ => Self::Production,
        }
    }

    /// Whether server-advertised retry delays should be ignored in favor of
    /// plain exponential backoff.
    pub fn is_low_volume(&self) -> bool {
        matches!(self, Self::Local | Self::Dev | Self::Test)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Dev => write!(f, "dev"),
            Self::Test => write!(f, "test"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Configuration for retry behavior on throttled calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts for one logical call, including the first (min 1).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// When false, a single attempt is made and its outcome returned.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Deployment environment, selecting between test-friendly and
    /// production-accurate delay policies.
    #[serde(default)]
    pub environment: Environment,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    2000
}

fn default_enabled() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            enabled: default_enabled(),
            environment: Environment::default(),
        }
    }
}

impl RetryConfig {
    /// Configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Set the attempt bound (clamped to at least 1).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the exponential-backoff base delay.
    #[must_use]
    pub fn with_initial_delay_ms(mut self, millis: u64) -> Self {
        self.initial_delay_ms = millis;
        self
    }

    /// Set the environment classification.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// The configured base delay as a [`Duration`].
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Load configuration from `CEDULA_*` environment variables, using the
    /// documented defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_attempts: u32 = env_parse("CEDULA_RETRY_MAX_ATTEMPTS", default_max_attempts())?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                var: "CEDULA_RETRY_MAX_ATTEMPTS".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay_ms: env_parse("CEDULA_RETRY_INITIAL_DELAY_MS", default_initial_delay_ms())?,
            enabled: env_bool("CEDULA_RETRY_ENABLED", default_enabled())?,
            environment: std::env::var("CEDULA_ENVIRONMENT")
                .map(|raw| Environment::classify(&raw))
                .unwrap_or_default(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
            reason: "not a valid number".to_string(),
        }),
    }
}

fn env_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
                reason: "expected true/false/1/0".to_string(),
            }),
        },
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be used.
    #[error("invalid value for {var}: \"{value}\" ({reason})")]
    InvalidValue {
        /// The variable that was set.
        var: String,
        /// The raw value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
