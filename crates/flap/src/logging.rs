//! Diagnostic logging for flap.
//!
//! Everything goes to stderr: stdout carries the annotated command output.
//!
//! # Environment Variables
//!
//! - `FLAP_LOG` - Log filter (overrides RUST_LOG)
//! - `FLAP_LOG_FORMAT` - Output format: compact, json
//! - `RUST_LOG` - Standard Rust log filter (fallback)

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable format
    #[default]
    Compact,
    /// JSON format for log aggregation systems
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Unknown log format: '{}'. Valid options: compact, json",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level (default: WARN)
    pub level: Level,
    pub format: LogFormat,
    /// Custom filter string (overrides level if set)
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Maps the number of `-v` flags to a level.
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    /// Reads `FLAP_LOG`, then `RUST_LOG`, and `FLAP_LOG_FORMAT`.
    pub fn with_env_overrides(mut self) -> Self {
        if self.filter.is_none() {
            if let Ok(filter) = std::env::var("FLAP_LOG") {
                self.filter = Some(filter);
            } else if let Ok(filter) = std::env::var("RUST_LOG") {
                self.filter = Some(filter);
            }
        }

        if let Ok(format) = std::env::var("FLAP_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        self
    }

    fn build_filter(&self) -> EnvFilter {
        let default_filter = self.level.to_string().to_lowercase();
        match self.filter {
            Some(ref filter) => EnvFilter::try_new(filter).unwrap_or_else(|_| {
                eprintln!("Warning: Invalid log filter '{}', using default", filter);
                EnvFilter::new(&default_filter)
            }),
            None => EnvFilter::new(&default_filter),
        }
    }
}

/// Installs the global subscriber and routes `log` records into it.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(config: LogConfig) {
    let filter = config.build_filter();

    let result = match config.format {
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_names(true)
                .with_writer(std::io::stderr);
            let subscriber = tracing_subscriber::registry().with(filter).with(layer);
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_thread_names(true)
                .with_writer(std::io::stderr);
            let subscriber = tracing_subscriber::registry().with(filter).with(layer);
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if result.is_err() {
        return;
    }

    // Runner and collector log through the `log` facade.
    let _ = tracing_log::LogTracer::init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("COMPACT".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
    }

    #[test]
    fn test_explicit_filter_wins_over_env() {
        let config = LogConfig {
            filter: Some("flap=debug".to_string()),
            ..LogConfig::default()
        }
        .with_env_overrides();
        assert_eq!(config.filter.as_deref(), Some("flap=debug"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(LogConfig::default());
        init(LogConfig::from_verbosity(3));
    }
}
