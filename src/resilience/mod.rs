//! Resilience helpers.
//!
//! Only the readiness wait retries anything, and by default it retries
//! forever at a fixed interval. `backoff.rs` provides the optional
//! exponential schedule.

pub mod backoff;
