//! The launch sequence: engine → readiness wait → initializer → idle.

use std::convert::Infallible;

use thiserror::Error;
use tokio::sync::{broadcast, watch};

use crate::config::{Credentials, EngineConfig, LauncherConfig};
use crate::engine::{EngineError, EngineSupervisor};
use crate::initializer::{CommandInitializer, DatabaseUrlError, Initializer};
use crate::lifecycle::shutdown;
use crate::lifecycle::state::LauncherState;
use crate::readiness::{wait_until_ready_with, ConfiguredProbe, ReadinessProbe, WaitError, WaitPolicy};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    DatabaseUrl(#[from] DatabaseUrlError),
}

/// Runs the launch sequence once.
///
/// Generic over the probe and the initializer so the ordering can be
/// exercised without a database.
pub struct Launcher<P, I> {
    engine: EngineConfig,
    credentials: Credentials,
    probe: P,
    policy: WaitPolicy,
    initializer: I,
    state: watch::Sender<LauncherState>,
}

impl Launcher<ConfiguredProbe, CommandInitializer> {
    pub fn from_config(config: &LauncherConfig) -> Result<Self, LaunchError> {
        let initializer =
            CommandInitializer::from_config(&config.initializer, &config.credentials, &config.probe)?;

        Ok(Self::new(
            config.engine.clone(),
            config.credentials.clone(),
            ConfiguredProbe::from_config(&config.probe),
            WaitPolicy::from(&config.wait),
            initializer,
        ))
    }
}

impl<P, I> Launcher<P, I>
where
    P: ReadinessProbe,
    I: Initializer,
{
    pub fn new(
        engine: EngineConfig,
        credentials: Credentials,
        probe: P,
        policy: WaitPolicy,
        initializer: I,
    ) -> Self {
        let (state, _) = watch::channel(LauncherState::Starting);
        Self {
            engine,
            credentials,
            probe,
            policy,
            initializer,
            state,
        }
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LauncherState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LauncherState {
        *self.state.borrow()
    }

    /// Launch the engine and drive the sequence until shutdown is requested.
    ///
    /// Returns `Ok(())` only after shutdown. An engine that fails to start is
    /// logged and the wait carries on, so the only error under the default
    /// policy is failing to stop the engine when `stop_on_shutdown` is set.
    /// A configured attempt bound adds [`WaitError::Exhausted`].
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<(), LaunchError> {
        let mut engine = match EngineSupervisor::spawn(&self.engine, &self.credentials) {
            Ok(engine) => Some(engine),
            Err(e) => {
                tracing::warn!(error = %e, "Engine did not start, waiting for it anyway");
                None
            }
        };

        let outcome = tokio::select! {
            result = self.sequence(engine.as_mut()) => match result {
                Ok(never) => match never {},
                Err(e) => Err(e),
            },
            _ = shutdown::requested(&mut shutdown_rx) => {
                tracing::debug!(state = %self.state(), "Launcher stopping");
                Ok(())
            }
        };

        if let (true, Some(engine)) = (self.engine.stop_on_shutdown, engine.as_mut()) {
            if let Err(e) = engine.terminate(self.engine.stop_timeout()).await {
                if outcome.is_ok() {
                    return Err(e.into());
                }
                tracing::warn!(error = %e, "Failed to stop engine");
            }
        }

        outcome
    }

    async fn sequence(&self, mut engine: Option<&mut EngineSupervisor>) -> Result<Infallible, LaunchError> {
        self.advance(LauncherState::WaitingForEngine);
        tracing::info!(probe = %self.probe.target(), "Waiting for engine to accept connections");

        let mut exit_reported = false;
        let attempts = wait_until_ready_with(&self.probe, &self.policy, |attempt| {
            if exit_reported {
                return;
            }
            if let Some(status) = engine.as_mut().and_then(|engine| engine.try_status()) {
                exit_reported = true;
                tracing::warn!(attempt, status = %status, "Engine exited before becoming ready");
            }
        })
        .await?;
        tracing::debug!(attempts, "Engine is ready");

        self.advance(LauncherState::Initializing);
        tracing::info!("Running initializer");

        let outcome = self.initializer.run().await;
        if outcome.is_success() {
            tracing::debug!(outcome = %outcome, "Initializer finished");
        } else {
            tracing::warn!(outcome = %outcome, "Initializer failed, continuing");
        }

        self.advance(LauncherState::Idle);
        Ok(idle_forever().await)
    }

    fn advance(&self, next: LauncherState) {
        let previous = self.state.send_replace(next);
        debug_assert!(previous.can_advance_to(next), "{} -> {}", previous, next);
        tracing::debug!(from = %previous, to = %next, "Launcher state changed");
    }
}

/// Park the task without doing any work. Never resolves.
pub async fn idle_forever() -> Infallible {
    std::future::pending().await
}
