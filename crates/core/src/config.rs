//! Logging configuration.
//!
//! Pools and the registry only emit `tracing` events. Embedding applications
//! that want those events printed can build a [`LogConfig`] (usually from the
//! environment) and install a subscriber with [`LogConfig::init_tracing`].

use std::str::FromStr;

/// Filter directive variable. Falls back to `RUST_LOG` when unset.
pub const LOG_FILTER_ENV: &str = "FUNDPOOL_LOG";
/// Output format variable: `pretty` or `json`.
pub const LOG_FORMAT_ENV: &str = "FUNDPOOL_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("log format must be `pretty` or `json`, got `{0}`")]
    InvalidLogFormat(String),
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}

// =============================================================================
// LogConfig
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `fundpool=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let filter = lookup(LOG_FILTER_ENV).or_else(|| lookup("RUST_LOG"));
        if let Some(filter) = filter {
            if !filter.trim().is_empty() {
                config.filter = filter.trim().to_string();
            }
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            match format.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!(error = %e, "Ignoring {LOG_FORMAT_ENV}"),
            }
        }

        config
    }

    /// Install a global `tracing` subscriber for this configuration.
    ///
    /// Fails if the filter does not parse or a global subscriber is already
    /// installed.
    #[cfg(feature = "trace")]
    pub fn init_tracing(&self) -> Result<(), ConfigError> {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_new(&self.filter).map_err(|e| ConfigError::InvalidFilter {
            filter: self.filter.clone(),
            reason: e.to_string(),
        })?;
        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.format {
            LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        };
        installed.map_err(|e| ConfigError::SubscriberInit(e.to_string()))
    }
}
