//! # Fleet Models
//!
//! The entities one invocation works with:
//!
//! * **[`target`]**: One registered host and its login credentials.
//! * **[`registry`]**: The full durable list of targets.
//! * **[`selection`]**: Which registered targets take part in an invocation.
//! * **[`operation`]**: The unit of work applied to every selected target.
//! * **[`outcome`]**: What happened on each target.

pub mod operation;
pub mod outcome;
pub mod registry;
pub mod selection;
pub mod target;
