//! Launcher state machine.
//!
//! # States
//! ```text
//! Starting → WaitingForEngine → Initializing → Idle
//! ```
//!
//! Transitions only move forward. There is no error state: initializer
//! failures and slow engines are absorbed, and `Idle` is held until the
//! process is told to stop.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LauncherState {
    Starting,
    WaitingForEngine,
    Initializing,
    Idle,
}

impl LauncherState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: LauncherState) -> bool {
        use LauncherState::*;
        matches!(
            (self, next),
            (Starting, WaitingForEngine) | (WaitingForEngine, Initializing) | (Initializing, Idle)
        )
    }
}

impl fmt::Display for LauncherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LauncherState::Starting => "starting",
            LauncherState::WaitingForEngine => "waiting_for_engine",
            LauncherState::Initializing => "initializing",
            LauncherState::Idle => "idle",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::LauncherState::*;

    #[test]
    fn test_only_forward_single_steps() {
        assert!(Starting.can_advance_to(WaitingForEngine));
        assert!(WaitingForEngine.can_advance_to(Initializing));
        assert!(Initializing.can_advance_to(Idle));

        assert!(!Starting.can_advance_to(Initializing));
        assert!(!Idle.can_advance_to(Starting));
        assert!(!Initializing.can_advance_to(WaitingForEngine));
        assert!(!Idle.can_advance_to(Idle));
    }

    #[test]
    fn test_ordering_follows_lifecycle() {
        assert!(Starting < WaitingForEngine);
        assert!(Initializing < Idle);
    }
}
