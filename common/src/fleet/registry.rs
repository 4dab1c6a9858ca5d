use serde::{Deserialize, Serialize};

use crate::fleet::target::Target;

/// Every registered target, in insertion order.
///
/// Always holds the complete persisted set; it is loaded whole and saved whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub targets: Vec<Target>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn contains_ip(&self, ip: &str) -> bool {
        self.targets.iter().any(|target| target.ip == ip)
    }

    pub fn push(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// Removes the first target registered under `ip`.
    pub fn remove_first(&mut self, ip: &str) -> Option<Target> {
        let idx = self.targets.iter().position(|target| target.ip == ip)?;
        Some(self.targets.remove(idx))
    }
}

impl FromIterator<Target> for Registry {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
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
