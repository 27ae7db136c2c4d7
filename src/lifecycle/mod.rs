//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Launch (launcher.rs):
//!     Spawn engine → Wait until ready → Run initializer → Idle
//!
//! Shutdown (shutdown.rs):
//!     Broadcast trigger observed by the launcher in every state
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: the initializer never overlaps the wait
//! - No error state: initializer failures are logged and absorbed
//! - Exit only happens through shutdown (or an exhausted opt-in wait bound)

pub mod launcher;
pub mod shutdown;
pub mod signals;
pub mod state;

pub use launcher::{idle_forever, LaunchError, Launcher};
pub use shutdown::Shutdown;
pub use state::LauncherState;
