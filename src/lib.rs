//! logcause - Teaching log cause/effect rules
//!
//! This crate re-exports all layers of the logcause system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: logcause_teacher    — Rule orchestrator, configuration store, rule export
//! Layer 2: logcause_constraint — Constraint types, constraint linkage graph
//! Layer 1: logcause_pattern    — Regex/span translation, guessing, pattern containers
//! Layer 0: logcause_foundation — Core types (ids, Span, Converter, Error)
//! ```

pub use logcause_constraint as constraint;
pub use logcause_foundation as foundation;
pub use logcause_pattern as pattern;
pub use logcause_teacher as teacher;

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`.
///
/// The library crates only emit events; call this once from a binary or
/// test that wants to see them.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
