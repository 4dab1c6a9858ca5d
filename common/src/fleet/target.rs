//! # Target Model
//!
//! A target is one remote host the operator registered, written on the command line as
//! `user:pass@ip`.
//!
//! The combined form is split once on the **last** `@` (the address never contains one)
//! and the credentials part once on the **first** `:` (user names never contain one), so
//! passwords may contain both `:` and `@`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// One registered host with its login credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub user: String,
    #[serde(rename = "password")]
    pub pass: String,
    pub ip: String,
    /// Secret fed to `sudo` for elevated runs. Falls back to the login password.
    #[serde(
        rename = "sudo_password",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub escalation_password: Option<String>,
}

/// The printable part of a target: everything except its secrets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetIdentity {
    pub user: String,
    pub ip: String,
}

impl Target {
    pub fn new(user: impl Into<String>, pass: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
            ip: ip.into(),
            escalation_password: None,
        }
    }

    pub fn with_escalation_password(mut self, password: impl Into<String>) -> Self {
        self.escalation_password = Some(password.into());
        self
    }

    /// The secret handed to the privilege escalation prompt.
    pub fn escalation_secret(&self) -> &str {
        self.escalation_password.as_deref().unwrap_or(&self.pass)
    }

    pub fn identity(&self) -> TargetIdentity {
        TargetIdentity {
            user: self.user.clone(),
            ip: self.ip.clone(),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .field("ip", &self.ip)
            .finish()
    }
}

impl fmt::Display for TargetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.ip)
    }
}

impl FromStr for Target {
    type Err = RegistryError;

    /// Parses `user:pass@ip`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RegistryError::MalformedTarget {
            input: s.to_string(),
        };

        let (credentials, ip) = s.rsplit_once('@').ok_or_else(malformed)?;
        let (user, pass) = credentials.split_once(':').ok_or_else(malformed)?;

        if user.is_empty() || pass.is_empty() || ip.is_empty() {
            return Err(malformed());
        }

        Ok(Target::new(user, pass, ip))
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
