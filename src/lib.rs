//! PostGIS container launcher library.
//!
//! Starts the database engine, waits until it accepts connections, runs a
//! one-shot initializer and then idles until the container is stopped.

pub mod config;
pub mod engine;
pub mod initializer;
pub mod lifecycle;
pub mod observability;
pub mod readiness;
pub mod resilience;

pub use config::schema::LauncherConfig;
pub use lifecycle::{Launcher, LauncherState, Shutdown};
