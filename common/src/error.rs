//! # Error Taxonomy
//!
//! Local failures (registry, selection) abort an invocation before any remote work starts.
//! Remote failures ([`RemoteError`]) are recorded per target and never abort a batch.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures of the durable registry file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read registry {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("registry {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write registry {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Failures of registry edits (`config -a`, `config -r`).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid target format; use: username:password@127.0.0.1")]
    MalformedTarget { input: String },

    #[error("a target with IP {ip} is already registered")]
    DuplicateTarget { ip: String },

    #[error("IP {ip} was not found in the registry")]
    TargetNotFound { ip: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures that stop an invocation before the batch starts.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no targets in the registry match the given IP(s)")]
    NoTargetsResolved,
}

/// Failures of one target inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("cannot connect to {addr}: {reason}")]
    ConnectionFailed { addr: String, reason: String },

    #[error("authentication as {user} on {addr} was rejected: {reason}")]
    AuthenticationFailed {
        user: String,
        addr: String,
        reason: String,
    },

    #[error("remote command failed{}", exit_suffix(.exit_status))]
    RemoteCommandFailed { exit_status: Option<i32> },

    #[error("transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },

    #[error("operation did not finish within {}s", .limit.as_secs())]
    Timeout { limit: Duration },

    #[error("session broke down: {reason}")]
    Transport { reason: String },

    #[error("worker aborted: {reason}")]
    Aborted { reason: String },
}

impl RemoteError {
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, RemoteError::ConnectionFailed { .. })
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RemoteError::AuthenticationFailed { .. })
    }
}

fn exit_suffix(exit_status: &Option<i32>) -> String {
    match exit_status {
        Some(code) => format!(" with exit status {code}"),
        None => String::new(),
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
