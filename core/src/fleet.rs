//! # Fleet Service
//!
//! Implements the two use cases of the tool: managing the target registry and running
//! one operation across a selection of targets.
//!
//! Storage and transport stay behind the [`RegistryRepository`] and [`SessionConnector`]
//! ports, so the service itself never touches the filesystem or the network.

use std::sync::Arc;

use tracing::debug;

use orchestrate_common::error::{FleetError, RegistryError};
use orchestrate_common::fleet::operation::{Operation, UploadSource};
use orchestrate_common::fleet::outcome::BatchReport;
use orchestrate_common::fleet::registry::Registry;
use orchestrate_common::fleet::selection::Selection;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::repository::RegistryRepository;
use orchestrate_common::session::SessionConnector;

use crate::batch::BatchRunner;
use crate::executor::job_for;
use crate::resolver;

/// Application service for fleet operations.
///
/// Orchestrates a run by:
/// 1. loading the registry through the [`RegistryRepository`].
/// 2. resolving the [`Selection`] into an ordered target list.
/// 3. handing one job per target to the [`BatchRunner`].
pub struct FleetService {
    store: Box<dyn RegistryRepository>,
    connector: Arc<dyn SessionConnector>,
    runner: BatchRunner,
}

impl FleetService {
    pub fn new(
        store: Box<dyn RegistryRepository>,
        connector: Arc<dyn SessionConnector>,
        runner: BatchRunner,
    ) -> Self {
        Self {
            store,
            connector,
            runner,
        }
    }

    /// Registers a target given as `user:pass@ip`.
    pub fn add_target(&self, spec: &str) -> Result<Target, RegistryError> {
        let target = self.store.add(spec)?;
        debug!("registered {}", target.identity());
        Ok(target)
    }

    /// Registers an already built target, e.g. one carrying a separate sudo password.
    pub fn insert_target(&self, target: Target) -> Result<Target, RegistryError> {
        self.store.insert(target.clone())?;
        debug!("registered {}", target.identity());
        Ok(target)
    }

    pub fn remove_target(&self, ip: &str) -> Result<Target, RegistryError> {
        let target = self.store.remove(ip)?;
        debug!("unregistered {}", target.identity());
        Ok(target)
    }

    pub fn list_targets(&self) -> Result<Registry, FleetError> {
        Ok(self.store.load()?)
    }

    /// The targets `selection` picks, in execution order.
    pub fn resolve(&self, selection: &Selection) -> Result<Vec<Target>, FleetError> {
        if selection.is_empty() {
            return Err(FleetError::NoTargetsResolved);
        }
        let registry = self.store.load()?;
        let targets = resolver::resolve(&registry, selection);
        if targets.is_empty() {
            return Err(FleetError::NoTargetsResolved);
        }
        Ok(targets)
    }

    pub async fn run_command(
        &self,
        selection: &Selection,
        command: impl Into<String>,
        elevated: bool,
    ) -> Result<BatchReport, FleetError> {
        let operation = Operation::Command {
            command: command.into(),
            elevated,
        };
        self.execute(selection, &operation).await
    }

    pub async fn upload(
        &self,
        selection: &Selection,
        source: UploadSource,
        destination: impl Into<String>,
    ) -> Result<BatchReport, FleetError> {
        let operation = Operation::Transfer {
            source,
            destination: destination.into(),
        };
        self.execute(selection, &operation).await
    }

    /// Resolves `selection` and carries `operation` out on every resolved target.
    ///
    /// Only failures that stop the whole run (unreadable registry, empty selection) come
    /// back as `Err`. Per-target failures are inside the returned [`BatchReport`].
    pub async fn execute(
        &self,
        selection: &Selection,
        operation: &Operation,
    ) -> Result<BatchReport, FleetError> {
        let targets = self.resolve(selection)?;
        Ok(self.execute_on(targets, operation).await)
    }

    /// Carries `operation` out on targets that were already resolved.
    pub async fn execute_on(&self, targets: Vec<Target>, operation: &Operation) -> BatchReport {
        debug!("{operation} on {} target(s)", targets.len());
        let job = job_for(operation, self.connector.clone());
        self.runner.run(targets, job).await
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
