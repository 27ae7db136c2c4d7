//! Database engine process.
//!
//! # Responsibilities
//! - Spawn the engine once with credentials in its environment
//! - Keep the child handle so it can be inspected or stopped later
//!
//! # Design Decisions
//! - The engine is not joined; it outlives the launch sequence
//! - Stopping it on shutdown is opt-in (`engine.stop_on_shutdown`)

pub mod supervisor;

pub use supervisor::{EngineError, EngineSupervisor};
