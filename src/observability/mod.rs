//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! launcher, probes, engine supervisor
//!     → logging.rs (structured log events)
//!     → stdout (pretty/compact) or JSON lines
//! ```

pub mod logging;

pub use logging::init_logging;
