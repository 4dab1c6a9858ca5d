//! # Remote Session
//!
//! The contract every remote transport implements.
//!
//! A [`SessionConnector`] authenticates to one target and hands back a [`RemoteSession`].
//! Each operation consumes the session, so a session serves exactly one operation and its
//! transport is torn down when the operation returns, whichever way it returns.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::RemoteError;
use crate::fleet::target::Target;

/// Program used for elevated runs. `-S` reads the password from stdin, `-p ''` silences
/// the prompt so it never lands in the captured output.
pub const ESCALATION_PREFIX: &str = "sudo -S -p ''";

pub trait SessionConnector: Send + Sync {
    /// Authenticates to `target`.
    ///
    /// Unreachable hosts yield [`RemoteError::ConnectionFailed`], rejected credentials
    /// [`RemoteError::AuthenticationFailed`]. Triggering `interrupt` must make any
    /// blocking call on the returned session give up.
    fn open(
        &self,
        target: &Target,
        interrupt: &Interrupt,
    ) -> Result<Box<dyn RemoteSession>, RemoteError>;
}

pub trait RemoteSession: Send {
    /// Runs `invocation` in a fresh remote shell and captures stdout and stderr together.
    fn execute(self: Box<Self>, invocation: &Invocation) -> Result<CommandOutput, RemoteError>;

    /// Copies one local file to `remote_path`.
    fn transfer(self: Box<Self>, local_path: &Path, remote_path: &str) -> Result<(), RemoteError>;

    fn run(self: Box<Self>, command: &str) -> Result<CommandOutput, RemoteError> {
        self.execute(&Invocation::plain(command))
    }

    fn run_privileged(
        self: Box<Self>,
        command: &str,
        password: &str,
    ) -> Result<CommandOutput, RemoteError> {
        self.execute(&Invocation::privileged(command, password))
    }
}

/// Stops work on one target from outside its worker thread.
///
/// Transports register hooks that tear their connection down. [`Interrupt::trigger`] runs
/// every registered hook once, and a hook registered after the trigger runs immediately.
#[derive(Clone, Default)]
pub struct Interrupt {
    state: Arc<Mutex<InterruptState>>,
}

#[derive(Default)]
struct InterruptState {
    triggered: bool,
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_trigger(&self, hook: impl FnOnce() + Send + 'static) {
        let mut state = self.lock();
        if state.triggered {
            drop(state);
            hook();
        } else {
            state.hooks.push(Box::new(hook));
        }
    }

    pub fn trigger(&self) {
        let hooks = {
            let mut state = self.lock();
            state.triggered = true;
            std::mem::take(&mut state.hooks)
        };
        for hook in hooks {
            hook();
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.lock().triggered
    }

    fn lock(&self) -> MutexGuard<'_, InterruptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}

/// The exact remote command line plus whatever gets written to its stdin.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn plain(command: &str) -> Self {
        Self {
            command: command.to_string(),
            stdin: None,
        }
    }

    pub fn privileged(command: &str, password: &str) -> Self {
        Self {
            command: format!("{ESCALATION_PREFIX} {command}"),
            stdin: Some(format!("{password}\n")),
        }
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.command)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: Vec<u8>,
    /// `None` when the command died from a signal and never reported a status.
    pub exit_status: Option<i32>,
}

impl CommandOutput {
    pub fn ok(&self) -> bool {
        self.exit_status == Some(0)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
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
