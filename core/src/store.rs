//! # JSON Registry Store
//!
//! Persists the registry as one pretty-printed JSON document:
//!
//! ```json
//! {
//!     "targets": [
//!         {
//!             "user": "alice",
//!             "password": "secret",
//!             "ip": "10.0.0.1"
//!         }
//!     ]
//! }
//! ```
//!
//! Every save rewrites the whole file with a fixed four-space indentation so the file
//! stays easy to diff.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use orchestrate_common::error::StoreError;
use orchestrate_common::fleet::registry::Registry;
use orchestrate_common::repository::RegistryRepository;

const INDENT: &[u8] = b"    ";

#[derive(Debug, Clone)]
pub struct JsonRegistryStore {
    path: PathBuf,
}

impl JsonRegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RegistryRepository for JsonRegistryStore {
    /// A registry file that does not exist yet is an empty registry.
    fn load(&self) -> Result<Registry, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("registry {} does not exist yet", self.path.display());
                return Ok(Registry::new());
            }
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let registry: Registry =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            "loaded {} target(s) from {}",
            registry.len(),
            self.path.display()
        );
        Ok(registry)
    }

    fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let bytes = to_pretty_json(registry)?;
        let unwritable = |source| StoreError::Unwritable {
            path: self.path.clone(),
            source,
        };

        // Readers see either the old file or the new one, never a partial write.
        let staging = self.staging_path();
        std::fs::write(&staging, bytes).map_err(unwritable)?;
        if let Err(source) = std::fs::rename(&staging, &self.path) {
            let _ = std::fs::remove_file(&staging);
            return Err(unwritable(source));
        }

        debug!(
            "saved {} target(s) to {}",
            registry.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn to_pretty_json(registry: &Registry) -> Result<Vec<u8>, StoreError> {
    let mut buffer: Vec<u8> = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    registry
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    buffer.push(b'\n');
    Ok(buffer)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
