//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Choose the output format (pretty, compact, JSON)
//! - Apply the configured level unless `RUST_LOG` overrides it
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for log shippers, pretty format for a terminal
//! - Engine and initializer output is not captured; it goes straight to
//!   the container's stdout/stderr

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::{LogFormat, ObservabilityConfig};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str) -> String {
    format!("{}={}", env!("CARGO_CRATE_NAME"), level.to_ascii_lowercase())
}

fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_filter(config))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_targets_this_crate() {
        assert_eq!(default_directive("DEBUG"), "postgis_launcher=debug");
    }

    #[test]
    fn test_second_init_fails() {
        let config = ObservabilityConfig {
            format: LogFormat::Compact,
            ..ObservabilityConfig::default()
        };
        // Another test may have installed a subscriber already; either way the
        // second call in this test must be rejected.
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
