//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, port non-zero)
//! - Reject empty program names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LauncherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{BackoffKind, LauncherConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `wait.interval_secs`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint and collect all violations.
pub fn validate_config(config: &LauncherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.engine.program.trim().is_empty() {
        errors.push(ValidationError::new("engine.program", "must not be empty"));
    }

    if config.probe.host.trim().is_empty() {
        errors.push(ValidationError::new("probe.host", "must not be empty"));
    }
    if config.probe.port == 0 {
        errors.push(ValidationError::new("probe.port", "must be between 1 and 65535"));
    }
    if config.probe.program.trim().is_empty() {
        errors.push(ValidationError::new("probe.program", "must not be empty"));
    }
    if config.probe.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("probe.connect_timeout_ms", "must be greater than 0"));
    }

    if config.wait.interval_secs == 0 {
        errors.push(ValidationError::new("wait.interval_secs", "must be greater than 0"));
    }
    if config.wait.max_attempts == Some(0) {
        errors.push(ValidationError::new(
            "wait.max_attempts",
            "must be at least 1 (omit it to wait forever)",
        ));
    }
    if config.wait.backoff == BackoffKind::Exponential
        && config.wait.max_interval_secs < config.wait.interval_secs
    {
        errors.push(ValidationError::new(
            "wait.max_interval_secs",
            "must not be smaller than wait.interval_secs",
        ));
    }

    if config.initializer.enabled && config.initializer.program.trim().is_empty() {
        errors.push(ValidationError::new(
            "initializer.program",
            "must not be empty (set initializer.enabled = false to skip it)",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
