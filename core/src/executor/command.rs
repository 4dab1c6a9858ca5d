use std::sync::Arc;

use tracing::debug;

use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::outcome::ExecutionResult;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{Interrupt, SessionConnector};

use crate::executor::Job;

/// Runs one shell command on a target, optionally through `sudo`.
pub struct CommandExecutor {
    connector: Arc<dyn SessionConnector>,
    command: String,
    elevated: bool,
}

impl CommandExecutor {
    pub fn new(connector: Arc<dyn SessionConnector>, command: String, elevated: bool) -> Self {
        Self {
            connector,
            command,
            elevated,
        }
    }
}

impl Job for CommandExecutor {
    fn execute(&self, target: &Target, interrupt: &Interrupt) -> ExecutionResult {
        let identity = target.identity();

        let session = match self.connector.open(target, interrupt) {
            Ok(session) => session,
            Err(err) => return ExecutionResult::failure(identity, String::new(), err),
        };

        let outcome = if self.elevated {
            session.run_privileged(&self.command, target.escalation_secret())
        } else {
            session.run(&self.command)
        };

        match outcome {
            Ok(out) if out.ok() => ExecutionResult::success(identity, out.text()),
            Ok(out) => {
                match out.exit_status {
                    Some(status) => debug!("{identity} exited with status {status}"),
                    None => debug!("{identity} was killed before reporting a status"),
                }
                ExecutionResult::failure(
                    identity,
                    out.text(),
                    RemoteError::RemoteCommandFailed {
                        exit_status: out.exit_status,
                    },
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
