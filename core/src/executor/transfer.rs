use std::sync::Arc;

use tracing::debug;

use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::operation::{UploadSource, remote_path_for};
use orchestrate_common::fleet::outcome::ExecutionResult;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{Interrupt, SessionConnector};

use crate::executor::Job;

/// Copies one local file to every target it is handed.
pub struct TransferExecutor {
    connector: Arc<dyn SessionConnector>,
    source: UploadSource,
    destination: String,
}

impl TransferExecutor {
    pub fn new(
        connector: Arc<dyn SessionConnector>,
        source: UploadSource,
        destination: String,
    ) -> Self {
        Self {
            connector,
            source,
            destination,
        }
    }
}

impl Job for TransferExecutor {
    fn execute(&self, target: &Target, interrupt: &Interrupt) -> ExecutionResult {
        let identity = target.identity();

        let local = match &self.source {
            UploadSource::File(path) => path,
            UploadSource::Directory(_) => {
                return ExecutionResult::failure(
                    identity,
                    String::new(),
                    RemoteError::NotImplemented {
                        feature: "directory upload",
                    },
                );
            }
        };

        let session = match self.connector.open(target, interrupt) {
            Ok(session) => session,
            Err(err) => return ExecutionResult::failure(identity, String::new(), err),
        };

        let remote = remote_path_for(local, &self.destination);
        match session.transfer(local, &remote) {
            Ok(()) => {
                debug!("uploaded {} to {identity}:{remote}", local.display());
                ExecutionResult::success(
                    identity,
                    format!("Uploaded {} to {remote}", local.display()),
                )
            }
            Err(err) => ExecutionResult::failure(identity, String::new(), err),
        }
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
