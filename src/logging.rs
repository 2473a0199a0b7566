//! logging
//!
//! Structured logging setup using `tracing-subscriber`.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the embedding program. [`init_logging`] installs one built from the
//! `[logging]` configuration section.
//!
//! # Filter precedence
//!
//! 1. The `DAGPATH_LOG` environment variable, as a full `EnvFilter` directive string
//! 2. The configured `level` plus one directive per `[logging.modules]` entry
//! 3. `info`

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::core::config::LoggingConfig;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "DAGPATH_LOG";

/// Level used when neither the environment nor the configuration sets one.
const DEFAULT_LEVEL: &str = "info";

/// Errors from logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A filter directive could not be parsed.
    #[error("invalid log directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },

    /// The output format is neither `text` nor `json`.
    #[error("invalid log format '{0}' (must be 'text' or 'json')")]
    InvalidFormat(String),

    /// A global subscriber was already installed.
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name from configuration.
    pub fn parse(name: &str) -> Result<Self, LoggingError> {
        match name {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggingError::InvalidFormat(other.to_string())),
        }
    }
}

/// Install a global subscriber writing to stderr.
///
/// # Errors
///
/// - `InvalidDirective` / `InvalidFormat` for bad settings
/// - `Init` if a global subscriber is already set
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let env_override = std::env::var(LOG_ENV).ok();
    let filter = build_env_filter(config, env_override.as_deref())?;
    let format = LogFormat::parse(config.format.as_deref().unwrap_or("text"))?;

    let subscriber = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}

/// Build the event filter from an optional override and the configuration.
fn build_env_filter(
    config: &LoggingConfig,
    env_override: Option<&str>,
) -> Result<EnvFilter, LoggingError> {
    if let Some(directives) = env_override.filter(|s| !s.trim().is_empty()) {
        return EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidDirective {
            directive: directives.to_string(),
            reason: e.to_string(),
        });
    }

    let level = config.level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let mut filter = EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidDirective {
        directive: level.to_string(),
        reason: e.to_string(),
    })?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        let parsed = directive
            .parse()
            .map_err(|e: tracing_subscriber::filter::ParseError| {
                LoggingError::InvalidDirective {
                    directive: directive.clone(),
                    reason: e.to_string(),
                }
            })?;
        filter = filter.add_directive(parsed);
    }

    Ok(filter)
}
