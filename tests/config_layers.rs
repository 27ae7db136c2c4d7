//! Configuration precedence: defaults < file < environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use postgis_launcher::config::{
    load_layered, validate_config, BackoffKind, ConfigError, LauncherConfig, LogFormat, ProbeKind,
};

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("postgis-launcher-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

/// File layer only, validated the way the binary does.
fn load_file(path: &Path) -> Result<LauncherConfig, ConfigError> {
    let config = load_layered(Some(path), |_| None)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

const FILE: &str = r#"
[engine]
program = "/usr/local/bin/docker-entrypoint.sh"
args = ["postgres", "-c", "shared_buffers=256MB"]
stop_on_shutdown = true

[credentials]
database = "buildings"

[probe]
kind = "tcp"
port = 6432

[wait]
interval_secs = 5
backoff = "exponential"
max_interval_secs = 60

[initializer]
enabled = false

[observability]
format = "json"
"#;

#[test]
fn test_file_overrides_defaults() {
    let path = write_temp("file", FILE);
    let config = load_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.engine.args.len(), 3);
    assert!(config.engine.stop_on_shutdown);
    assert_eq!(config.credentials.database, "buildings");
    // Untouched keys keep their defaults.
    assert_eq!(config.credentials.user, "postgres");
    assert_eq!(config.probe.kind, ProbeKind::Tcp);
    assert_eq!(config.probe.port, 6432);
    assert_eq!(config.probe.host, "localhost");
    assert_eq!(config.wait.interval_secs, 5);
    assert_eq!(config.wait.backoff, BackoffKind::Exponential);
    assert_eq!(config.observability.format, LogFormat::Json);
    assert_eq!(config.initializer.command(), None);
}

#[test]
fn test_env_overrides_file() {
    let path = write_temp("env", FILE);
    let config = load_layered(
        Some(&path),
        env(&[
            ("POSTGRES_DB", "nyc"),
            ("POSTGRES_PASSWORD", "from-env"),
            ("LAUNCHER_PROBE_PORT", "5433"),
        ]),
    )
    .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.credentials.database, "nyc");
    assert_eq!(config.credentials.password, "from-env");
    assert_eq!(config.probe.port, 5433);
    assert_eq!(config.wait.interval_secs, 5);
}

#[test]
fn test_env_initializer_reenables_file_setting() {
    let path = write_temp("reenable", FILE);
    let config = load_layered(
        Some(&path),
        env(&[("LAUNCHER_INITIALIZER", r#"["/opt/seed", "--data dir"]"#)]),
    )
    .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.initializer.command(), Some("/opt/seed"));
    assert_eq!(config.initializer.args, vec!["--data dir".to_string()]);
}

#[test]
fn test_no_file_uses_defaults_plus_env() {
    let config = load_layered(None, env(&[("LAUNCHER_POLL_INTERVAL_SECS", "9")])).unwrap();
    assert_eq!(config.wait.interval_secs, 9);
    assert_eq!(config.probe.port, 5432);
    assert_eq!(config.credentials.database, "gis");
}

#[test]
fn test_invalid_file_reports_every_problem() {
    let path = write_temp(
        "invalid",
        r#"
        [probe]
        port = 0

        [wait]
        interval_secs = 0
        "#,
    );
    let err = load_file(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    match err {
        ConfigError::Validation(errors) => {
            let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["probe.port", "wait.interval_secs"]);
        }
        other => panic!("expected validation error, got {}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("postgis-launcher-definitely-missing.toml");
    assert!(matches!(load_file(&path), Err(ConfigError::Io(_))));
}
