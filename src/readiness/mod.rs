//! Engine readiness subsystem.
//!
//! # Data Flow
//! ```text
//! wait.rs loop:
//!     probe.rs check (pg_isready or TCP connect)
//!     → ready: return attempt count
//!     → not ready: sleep per WaitPolicy, retry
//! ```
//!
//! # Design Decisions
//! - Default policy is a fixed interval with no attempt limit
//! - Probes never error; every failure means "not ready"
//! - Bounds and backoff are explicit configuration

pub mod probe;
pub mod wait;

pub use probe::{CommandProbe, ConfiguredProbe, ReadinessProbe, TcpProbe};
pub use wait::{wait_until_ready_with, WaitError, WaitPolicy};
