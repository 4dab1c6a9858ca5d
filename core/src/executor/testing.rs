//! Scripted stand-in for the SSH connector used by the unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{
    CommandOutput, Interrupt, Invocation, RemoteSession, SessionConnector,
};

/// How a scripted host behaves.
#[derive(Debug, Clone)]
pub enum Script {
    /// `status: None` is a command killed by a signal.
    Exit { status: Option<i32>, output: String },
    Unreachable,
    Rejected,
    Broken(String),
    Slow(Duration, Box<Script>),
}

impl Script {
    pub fn exit(status: i32, output: &str) -> Self {
        Script::Exit {
            status: Some(status),
            output: output.to_string(),
        }
    }

    pub fn killed(output: &str) -> Self {
        Script::Exit {
            status: None,
            output: output.to_string(),
        }
    }

    pub fn unreachable() -> Self {
        Script::Unreachable
    }

    pub fn rejected() -> Self {
        Script::Rejected
    }

    pub fn broken(reason: &str) -> Self {
        Script::Broken(reason.to_string())
    }

    pub fn after(self, delay: Duration) -> Self {
        Script::Slow(delay, Box::new(self))
    }
}

/// Sleeps for `delay` unless `interrupt` fires first. Returns whether it fired.
fn stall(delay: Duration, interrupt: &Interrupt) -> bool {
    let deadline = Instant::now() + delay;
    while Instant::now() < deadline {
        if interrupt.is_triggered() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    interrupt.is_triggered()
}

#[derive(Default)]
struct Log {
    invocations: Mutex<Vec<Invocation>>,
    transfers: Mutex<Vec<(PathBuf, String)>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    interrupted: AtomicUsize,
}

#[derive(Default)]
pub struct ScriptedConnector {
    scripts: HashMap<String, Script>,
    log: Arc<Log>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, ip: &str, script: Script) -> Self {
        self.scripts.insert(ip.to_string(), script);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.invocations.lock().unwrap().clone()
    }

    pub fn transfers(&self) -> Vec<(PathBuf, String)> {
        self.log.transfers.lock().unwrap().clone()
    }

    pub fn opened(&self) -> usize {
        self.log.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.log.closed.load(Ordering::SeqCst)
    }

    /// Connects abandoned because their interrupt fired.
    pub fn interrupted(&self) -> usize {
        self.log.interrupted.load(Ordering::SeqCst)
    }
}

impl SessionConnector for ScriptedConnector {
    fn open(
        &self,
        target: &Target,
        interrupt: &Interrupt,
    ) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let mut script = self
            .scripts
            .get(&target.ip)
            .cloned()
            .unwrap_or(Script::Unreachable);

        while let Script::Slow(delay, inner) = script {
            if stall(delay, interrupt) {
                self.log.interrupted.fetch_add(1, Ordering::SeqCst);
                return Err(RemoteError::Aborted {
                    reason: "interrupted".into(),
                });
            }
            script = *inner;
        }

        match script {
            Script::Unreachable => Err(RemoteError::ConnectionFailed {
                addr: format!("{}:22", target.ip),
                reason: "connection refused".into(),
            }),
            Script::Rejected => Err(RemoteError::AuthenticationFailed {
                user: target.user.clone(),
                addr: format!("{}:22", target.ip),
                reason: "permission denied".into(),
            }),
            script => {
                self.log.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ScriptedSession {
                    script,
                    log: self.log.clone(),
                }))
            }
        }
    }
}

struct ScriptedSession {
    script: Script,
    log: Arc<Log>,
}

impl RemoteSession for ScriptedSession {
    fn execute(self: Box<Self>, invocation: &Invocation) -> Result<CommandOutput, RemoteError> {
        self.log
            .invocations
            .lock()
            .unwrap()
            .push(invocation.clone());

        match &self.script {
            Script::Exit { status, output } => Ok(CommandOutput {
                output: output.as_bytes().to_vec(),
                exit_status: *status,
            }),
            Script::Broken(reason) => Err(RemoteError::Transport {
                reason: reason.clone(),
            }),
            _ => unreachable!("connection scripts never open a session"),
        }
    }

    fn transfer(self: Box<Self>, local_path: &Path, remote_path: &str) -> Result<(), RemoteError> {
        self.log
            .transfers
            .lock()
            .unwrap()
            .push((local_path.to_path_buf(), remote_path.to_string()));

        match &self.script {
            Script::Exit {
                status: Some(0), ..
            } => Ok(()),
            Script::Exit { output, .. } | Script::Broken(output) => {
                Err(RemoteError::TransferFailed {
                    reason: output.clone(),
                })
            }
            _ => unreachable!("connection scripts never open a session"),
        }
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
    }
}
