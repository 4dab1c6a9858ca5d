//! # Orchestrate Common
//!
//! Shared models and boundaries for the `orchestrate` fleet tool.
//!
//! * **[`fleet`]**: Targets, the registry, selection criteria and per-target results.
//! * **[`repository`]**: The contract every registry store implements.
//! * **[`session`]**: The contract every remote transport implements.
//! * **[`error`]**: The error taxonomy shared by all crates.
//! * **[`config`]**: Runtime knobs for one invocation.

pub mod config;
pub mod error;
pub mod fleet;
pub mod repository;
pub mod session;

mod macros;

#[doc(hidden)]
pub use tracing as __tracing;
