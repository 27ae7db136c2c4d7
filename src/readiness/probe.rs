//! Readiness probes.
//!
//! A probe answers one question: does the engine accept connections right
//! now? Probes never fail loudly; every problem is reported as "not ready".

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time;

use crate::config::{ProbeConfig, ProbeKind};

/// A boolean readiness check against the engine.
pub trait ReadinessProbe {
    /// Returns `true` once the engine accepts connections.
    fn probe(&self) -> impl Future<Output = bool> + Send;

    /// Human-readable target for log lines.
    fn target(&self) -> String;
}

/// Runs an external checker (usually `pg_isready`) and treats exit status 0
/// as ready.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `pg_isready`-style invocation: `PROGRAM -h HOST -p PORT -q`.
    pub fn pg_isready(program: impl Into<String>, host: &str, port: u16) -> Self {
        Self::new(
            program,
            ["-h".to_string(), host.to_string(), "-p".to_string(), port.to_string(), "-q".to_string()],
        )
    }
}

impl ReadinessProbe for CommandProbe {
    async fn probe(&self) -> bool {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => {
                if !status.success() {
                    tracing::debug!(program = %self.program, status = %status, "Probe reported not ready");
                }
                status.success()
            }
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "Probe could not be run");
                false
            }
        }
    }

    fn target(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Treats a completed TCP handshake as ready.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, connect_timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout,
        }
    }
}

impl ReadinessProbe for TcpProbe {
    async fn probe(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        match time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, port = self.port, error = %e, "Probe connection refused");
                false
            }
            Err(_) => {
                tracing::debug!(host = %self.host, port = self.port, "Probe connection timed out");
                false
            }
        }
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The probe selected by `probe.kind`.
#[derive(Debug, Clone)]
pub enum ConfiguredProbe {
    Command(CommandProbe),
    Tcp(TcpProbe),
}

impl ConfiguredProbe {
    pub fn from_config(config: &ProbeConfig) -> Self {
        match config.kind {
            ProbeKind::Command => ConfiguredProbe::Command(CommandProbe::pg_isready(
                config.program.clone(),
                &config.host,
                config.port,
            )),
            ProbeKind::Tcp => ConfiguredProbe::Tcp(TcpProbe::new(
                config.host.clone(),
                config.port,
                config.connect_timeout(),
            )),
        }
    }
}

impl ReadinessProbe for ConfiguredProbe {
    async fn probe(&self) -> bool {
        match self {
            ConfiguredProbe::Command(p) => p.probe().await,
            ConfiguredProbe::Tcp(p) => p.probe().await,
        }
    }

    fn target(&self) -> String {
        match self {
            ConfiguredProbe::Command(p) => p.target(),
            ConfiguredProbe::Tcp(p) => p.target(),
        }
    }
}
