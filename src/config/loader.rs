//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::config::schema::LauncherConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML document without semantic validation.
pub fn parse_config(content: &str) -> Result<LauncherConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts `std::env::var` so tests can supply a fixed map.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut LauncherConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(v) = get("POSTGRES_DB") {
        config.credentials.database = v;
    }
    if let Some(v) = get("POSTGRES_USER") {
        config.credentials.user = v;
    }
    if let Some(v) = get("POSTGRES_PASSWORD") {
        config.credentials.password = v;
    }
    if let Some(v) = get("LAUNCHER_PROBE_HOST") {
        config.probe.host = v;
    }
    if let Some(v) = get("LAUNCHER_PROBE_PORT") {
        config.probe.port = parse_env("LAUNCHER_PROBE_PORT", v)?;
    }
    if let Some(v) = get("LAUNCHER_POLL_INTERVAL_SECS") {
        config.wait.interval_secs = parse_env("LAUNCHER_POLL_INTERVAL_SECS", v)?;
    }
    if let Some(v) = get("LAUNCHER_INITIALIZER") {
        let argv = parse_command_line("LAUNCHER_INITIALIZER", v)?;
        match argv.split_first() {
            Some((program, args)) => {
                config.initializer.enabled = true;
                config.initializer.program = program.clone();
                config.initializer.args = args.to_vec();
            }
            None => config.initializer.enabled = false,
        }
    }
    if let Some(v) = get("LAUNCHER_LOG_LEVEL") {
        config.observability.log_level = v;
    }

    Ok(())
}

fn parse_env<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}

/// Split a command given through the environment into program and arguments.
///
/// A TOML array (`["python", "/app/my script.py"]`) keeps arguments that
/// contain spaces; anything else is split on whitespace. `none` and `[]`
/// yield an empty command.
fn parse_command_line(var: &'static str, value: String) -> Result<Vec<String>, ConfigError> {
    #[derive(Deserialize)]
    struct Argv {
        argv: Vec<String>,
    }

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return toml::from_str::<Argv>(&format!("argv = {}", trimmed))
            .map(|parsed| parsed.argv)
            .map_err(|_| ConfigError::Env { var, value });
    }
    Ok(trimmed.split_whitespace().map(str::to_string).collect())
}

/// Build the effective configuration: defaults, then the optional file,
/// then environment overrides. The result is not yet validated so that
/// command-line flags can still be applied on top.
pub fn load_layered<F>(path: Option<&Path>, lookup: F) -> Result<LauncherConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content)?
        }
        None => LauncherConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

/// Render the effective configuration as TOML with the password hidden.
pub fn to_toml_redacted(config: &LauncherConfig) -> Result<String, toml::ser::Error> {
    toml::to_string(&config.redacted())
}
