//! Shared fixtures: an in-memory fleet of fake hosts and a registry in a temp dir.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use orchestrate_common::error::RemoteError;
use orchestrate_common::fleet::target::Target;
use orchestrate_common::session::{
    CommandOutput, Interrupt, Invocation, RemoteSession, SessionConnector,
};
use orchestrate_core::batch::BatchRunner;
use orchestrate_core::fleet::FleetService;
use orchestrate_core::store::JsonRegistryStore;

/// A fake host. Hosts not registered with [`FakeFleet`] refuse connections.
#[derive(Debug, Clone)]
pub struct FakeHost {
    pub password: String,
    /// `None` plays a command killed by a signal.
    pub status: Option<i32>,
    pub output: String,
    pub delay: Duration,
}

impl FakeHost {
    pub fn answering(password: &str, output: &str) -> Self {
        Self {
            password: password.to_string(),
            status: Some(0),
            output: output.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn exiting(mut self, status: i32) -> Self {
        self.status = Some(status);
        self
    }

    pub fn killed(mut self) -> Self {
        self.status = None;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct Journal {
    invocations: Mutex<Vec<(String, Invocation)>>,
    uploads: Mutex<Vec<(String, PathBuf, String)>>,
    open_sessions: AtomicUsize,
}

#[derive(Default, Clone)]
pub struct FakeFleet {
    hosts: HashMap<String, FakeHost>,
    journal: Arc<Journal>,
}

impl FakeFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, ip: &str, host: FakeHost) -> Self {
        self.hosts.insert(ip.to_string(), host);
        self
    }

    /// `(ip, invocation)` pairs in the order the hosts received them.
    pub fn invocations(&self) -> Vec<(String, Invocation)> {
        self.journal.invocations.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, PathBuf, String)> {
        self.journal.uploads.lock().unwrap().clone()
    }

    /// Sessions opened and not yet torn down.
    pub fn open_sessions(&self) -> usize {
        self.journal.open_sessions.load(Ordering::SeqCst)
    }
}

impl SessionConnector for FakeFleet {
    fn open(
        &self,
        target: &Target,
        interrupt: &Interrupt,
    ) -> Result<Box<dyn RemoteSession>, RemoteError> {
        let addr = format!("{}:22", target.ip);
        let host = self
            .hosts
            .get(&target.ip)
            .cloned()
            .ok_or_else(|| RemoteError::ConnectionFailed {
                addr: addr.clone(),
                reason: "connection refused".into(),
            })?;

        let deadline = Instant::now() + host.delay;
        while Instant::now() < deadline {
            if interrupt.is_triggered() {
                return Err(RemoteError::Aborted {
                    reason: "interrupted".into(),
                });
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        if host.password != target.pass {
            return Err(RemoteError::AuthenticationFailed {
                user: target.user.clone(),
                addr,
                reason: "permission denied".into(),
            });
        }

        self.journal.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            ip: target.ip.clone(),
            host,
            journal: self.journal.clone(),
        }))
    }
}

struct FakeSession {
    ip: String,
    host: FakeHost,
    journal: Arc<Journal>,
}

impl RemoteSession for FakeSession {
    fn execute(self: Box<Self>, invocation: &Invocation) -> Result<CommandOutput, RemoteError> {
        self.journal
            .invocations
            .lock()
            .unwrap()
            .push((self.ip.clone(), invocation.clone()));
        Ok(CommandOutput {
            output: self.host.output.clone().into_bytes(),
            exit_status: self.host.status,
        })
    }

    fn transfer(self: Box<Self>, local_path: &Path, remote_path: &str) -> Result<(), RemoteError> {
        if !local_path.is_file() {
            return Err(RemoteError::TransferFailed {
                reason: format!("{} is not a regular file", local_path.display()),
            });
        }
        self.journal.uploads.lock().unwrap().push((
            self.ip.clone(),
            local_path.to_path_buf(),
            remote_path.to_string(),
        ));
        Ok(())
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.journal.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A registry file inside a fresh temp dir. Keep the `TempDir` alive for the test.
pub fn registry_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Config.json");
    (dir, path)
}

pub fn fleet_service(registry: &Path, fleet: &FakeFleet, runner: BatchRunner) -> FleetService {
    FleetService::new(
        Box::new(JsonRegistryStore::new(registry)),
        Arc::new(fleet.clone()),
        runner,
    )
}
