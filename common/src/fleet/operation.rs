use std::fmt;
use std::path::{Path, PathBuf};

/// Local side of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// `-f`: exactly one regular file.
    File(PathBuf),
    /// `-F`: a whole directory tree. Not implemented; every target reports `NotImplemented`.
    Directory(PathBuf),
}

/// The unit of work a batch applies to every selected target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Command {
        command: String,
        /// Run through `sudo`, answering its prompt with the target's escalation secret.
        elevated: bool,
    },
    Transfer {
        source: UploadSource,
        destination: String,
    },
}

impl UploadSource {
    pub fn path(&self) -> &Path {
        match self {
            UploadSource::File(path) | UploadSource::Directory(path) => path,
        }
    }
}

/// Where a file ends up remotely.
///
/// A destination ending in `/` names a directory, and the local file name is appended.
pub fn remote_path_for(local: &Path, destination: &str) -> String {
    match local.file_name() {
        Some(name) if destination.ends_with('/') => {
            format!("{destination}{}", name.to_string_lossy())
        }
        _ => destination.to_string(),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Command { command, elevated: true } => write!(f, "sudo {command}"),
            Operation::Command { command, .. } => write!(f, "{command}"),
            Operation::Transfer { source, destination } => {
                write!(f, "upload {} -> {destination}", source.path().display())
            }
        }
    }
}
