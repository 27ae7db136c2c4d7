//! PostGIS Container Launcher
//!
//! Entry point for the database container.
//!
//! # Sequence
//!
//! ```text
//!   ┌──────────┐    ┌────────────────────┐    ┌──────────────┐    ┌──────┐
//!   │ STARTING │───▶│ WAITING_FOR_ENGINE │───▶│ INITIALIZING │───▶│ IDLE │
//!   └──────────┘    └────────────────────┘    └──────────────┘    └──────┘
//!   spawn engine     probe every N seconds      run initializer     wait for
//!                    until it accepts            once, exit code     SIGTERM
//!                    connections                 ignored
//! ```

use std::path::PathBuf;

use clap::Parser;

use postgis_launcher::config::{load_layered, to_toml_redacted, validate_config, ConfigError, LauncherConfig};
use postgis_launcher::lifecycle::signals::spawn_signal_listener;
use postgis_launcher::observability::init_logging;
use postgis_launcher::{Launcher, Shutdown};

#[derive(Parser)]
#[command(name = "postgis-launcher")]
#[command(about = "Start PostGIS, wait for it, run the initializer, then idle", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Seconds between readiness probes.
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut LauncherConfig) {
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if let Some(secs) = self.poll_interval {
            config.wait.interval_secs = secs;
        }
    }

    /// Defaults, then the file, then `lookup` (the environment), then flags.
    fn effective_config<F>(&self, lookup: F) -> Result<LauncherConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = load_layered(self.config.as_deref(), lookup)?;
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.effective_config(|key| std::env::var(key).ok())?;

    if cli.print_config {
        print!("{}", to_toml_redacted(&config)?);
        return Ok(());
    }

    init_logging(&config.observability)?;

    tracing::debug!(
        engine = %config.engine.program,
        database = %config.credentials.database,
        host = %config.probe.host,
        port = config.probe.port,
        interval_secs = config.wait.interval_secs,
        "Configuration loaded"
    );

    let launcher = Launcher::from_config(&config)?;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    launcher.run(shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
