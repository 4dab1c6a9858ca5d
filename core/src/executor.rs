//! Per-target jobs.
//!
//! A [`Job`] opens its own session for every target it is handed and folds whatever
//! happens into an [`ExecutionResult`]. It never returns an error and never retries, so
//! one target's failure cannot leak into another's result.

use std::sync::Arc;

use orchestrate_common::fleet::operation::Operation;
use orchestrate_common::fleet::outcome::ExecutionResult;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{Interrupt, SessionConnector};

pub mod command;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use command::CommandExecutor;
pub use transfer::TransferExecutor;

pub trait Job: Send + Sync {
    /// Carries the job out on `target`. Once `interrupt` fires the result no longer
    /// matters and the job should return as soon as its transport lets it.
    fn execute(&self, target: &Target, interrupt: &Interrupt) -> ExecutionResult;
}

/// Builds the job that carries out `operation`.
pub fn job_for(operation: &Operation, connector: Arc<dyn SessionConnector>) -> Arc<dyn Job> {
    match operation {
        Operation::Command { command, elevated } => {
            Arc::new(CommandExecutor::new(connector, command.clone(), *elevated))
        }
        Operation::Transfer {
            source,
            destination,
        } => Arc::new(TransferExecutor::new(
            connector,
            source.clone(),
            destination.clone(),
        )),
    }
}
