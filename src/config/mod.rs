//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file (loader.rs)
//!     → environment overrides (POSTGRES_*, LAUNCHER_*)
//!     → command-line flags (main.rs)
//!     → validation.rs (semantic checks)
//!     → LauncherConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the launch sequence starts
//! - All fields have defaults so no file is required
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_layered, parse_config, to_toml_redacted, ConfigError};
pub use schema::{
    BackoffKind, Credentials, EngineConfig, InitializerConfig, LauncherConfig, LogFormat,
    ObservabilityConfig, ProbeConfig, ProbeKind, WaitConfig,
};
pub use validation::{validate_config, ValidationError};
