//! # Orchestrate Core
//!
//! The engine behind `orchestrate`: it resolves which registered targets take part in an
//! invocation and drives one remote operation across all of them.
//!
//! * **[`store`]**: JSON-file registry.
//! * **[`resolver`]**: Selection criteria to an ordered target list.
//! * **[`ssh`]**: Password-authenticated SSH sessions.
//! * **[`executor`]**: Command and file-transfer jobs for a single target.
//! * **[`batch`]**: Runs one job across many targets and collects every result.
//! * **[`fleet`]**: The use cases the CLI calls.

pub mod batch;
pub mod executor;
pub mod fleet;
pub mod resolver;
pub mod ssh;
pub mod store;
