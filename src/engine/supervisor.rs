//! Owned handle to the database engine process.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::{Child, Command};
use tokio::time;

use crate::config::{Credentials, EngineConfig};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to spawn engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to signal engine (pid {pid}): {source}")]
    Signal {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for engine: {0}")]
    Wait(#[source] io::Error),
}

/// The engine runs detached from the launch sequence: nothing waits on it
/// and dropping the supervisor leaves the process running.
#[derive(Debug)]
pub struct EngineSupervisor {
    child: Child,
    exited: Option<ExitStatus>,
}

impl EngineSupervisor {
    /// Start the engine with the credentials exported through its
    /// environment. Output is inherited so the engine logs to the container.
    pub fn spawn(config: &EngineConfig, credentials: &Credentials) -> Result<Self, EngineError> {
        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .envs(credentials.engine_env())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);

        let child = command.spawn().map_err(|source| EngineError::Spawn {
            program: config.program.clone(),
            source,
        })?;

        tracing::debug!(program = %config.program, pid = child.id(), "Engine process spawned");

        Ok(Self {
            child,
            exited: None,
        })
    }

    /// OS process id, or `None` once the process has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Non-blocking liveness check. Returns the exit status once the engine
    /// has stopped.
    pub fn try_status(&mut self) -> Option<ExitStatus> {
        if self.exited.is_none() {
            match self.child.try_wait() {
                Ok(status) => self.exited = status,
                Err(e) => tracing::debug!(error = %e, "Could not poll engine status"),
            }
        }
        self.exited
    }

    /// Ask the engine to stop with SIGTERM, escalating to a kill after
    /// `grace`.
    pub async fn terminate(&mut self, grace: Duration) -> Result<ExitStatus, EngineError> {
        if let Some(status) = self.try_status() {
            return Ok(status);
        }

        if let Some(pid) = self.child.id() {
            send_sigterm(pid)?;
            tracing::info!(pid, "Sent SIGTERM to engine");
        }

        let status = match time::timeout(grace, self.child.wait()).await {
            Ok(result) => result.map_err(EngineError::Wait)?,
            Err(_) => {
                tracing::warn!(grace_secs = grace.as_secs(), "Engine ignored SIGTERM, killing");
                self.child.kill().await.map_err(EngineError::Wait)?;
                self.child.wait().await.map_err(EngineError::Wait)?
            }
        };

        self.exited = Some(status);
        Ok(status)
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) -> Result<(), EngineError> {
    // SAFETY: kill(2) only inspects its integer arguments.
    let result = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if result == 0 {
        Ok(())
    } else {
        Err(EngineError::Signal {
            pid,
            source: io::Error::last_os_error(),
        })
    }
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) -> Result<(), EngineError> {
    // No SIGTERM here; `terminate` falls through to a kill after the grace period.
    Ok(())
}
