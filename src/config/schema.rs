//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the launcher.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the launcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Database engine process settings.
    pub engine: EngineConfig,

    /// Credentials exported to the engine (and the initializer's URL).
    pub credentials: Credentials,

    /// Readiness probe settings.
    pub probe: ProbeConfig,

    /// Polling policy for the readiness wait.
    pub wait: WaitConfig,

    /// One-shot initializer program.
    pub initializer: InitializerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl LauncherConfig {
    /// Copy safe to print or log.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.credentials.password = "<redacted>".to_string();
        config
    }
}

/// Engine process configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Program to launch (looked up on `PATH`).
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Send SIGTERM to the engine when the launcher shuts down.
    pub stop_on_shutdown: bool,

    /// Seconds to wait after SIGTERM before killing the engine.
    pub stop_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: "docker-entrypoint.sh".to_string(),
            args: vec!["postgres".to_string()],
            stop_on_shutdown: false,
            stop_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

/// Database credentials handed to the engine through its environment.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Credentials {
    /// Database name (`POSTGRES_DB`).
    pub database: String,

    /// Superuser name (`POSTGRES_USER`).
    pub user: String,

    /// Superuser password (`POSTGRES_PASSWORD`).
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            database: "gis".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Environment variables understood by the official postgres images.
    pub fn engine_env(&self) -> [(&'static str, &str); 3] {
        [
            ("POSTGRES_DB", self.database.as_str()),
            ("POSTGRES_USER", self.user.as_str()),
            ("POSTGRES_PASSWORD", self.password.as_str()),
        ]
    }
}

/// Which readiness check to run.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Run an external checker such as `pg_isready`.
    #[default]
    Command,
    /// Open a plain TCP connection.
    Tcp,
}

/// Readiness probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub kind: ProbeKind,

    /// Host the engine listens on.
    pub host: String,

    /// Port the engine listens on.
    pub port: u16,

    /// Checker program for `kind = "command"`. Receives `-h HOST -p PORT -q`.
    pub program: String,

    /// Per-attempt connect timeout in milliseconds for `kind = "tcp"`.
    pub connect_timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Command,
            host: "localhost".to_string(),
            port: 5432,
            program: "pg_isready".to_string(),
            connect_timeout_ms: 1000,
        }
    }
}

impl ProbeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Delay growth between failed probes.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    /// Sleep `interval` after every failure.
    #[default]
    Fixed,
    /// Double the delay after every failure, capped at `max_interval`.
    Exponential,
}

/// Readiness wait policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WaitConfig {
    /// Delay between probes in seconds.
    pub interval_secs: u64,

    /// Give up after this many failed probes. Unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    pub backoff: BackoffKind,

    /// Upper bound for exponential backoff in seconds.
    pub max_interval_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval_secs: 2,
            max_attempts: None,
            backoff: BackoffKind::Fixed,
            max_interval_secs: 30,
        }
    }
}

/// Initializer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct InitializerConfig {
    /// Run the initializer once the engine is ready. When false the
    /// initializing step is skipped.
    pub enabled: bool,

    /// Program to run (looked up on `PATH`).
    pub program: String,

    pub args: Vec<String>,

    /// Pass a `DATABASE_URL` built from the credentials and probe target.
    pub export_database_url: bool,
}

impl Default for InitializerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "python".to_string(),
            args: vec!["/app/init_db.py".to_string()],
            export_database_url: true,
        }
    }
}

impl InitializerConfig {
    /// The program to run, or `None` when the initializer is disabled.
    pub fn command(&self) -> Option<&str> {
        self.enabled.then_some(self.program.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
