use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REGISTRY: &str = "Config.json";
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_JOBS: usize = 4;

#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the JSON target registry.
    pub registry: PathBuf,

    /// Port the remote shell daemon listens on.
    pub port: u16,

    /// Upper bound for one target's whole operation (connect, act, disconnect).
    ///
    /// Also applied to the TCP connect and to every blocking SSH call.
    pub timeout: Duration,

    /// Maximum number of targets worked on at the same time.
    pub jobs: usize,

    /// 0 prints everything, 1 drops decoration, 2 prints only the summary.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: PathBuf::from(DEFAULT_REGISTRY),
            port: DEFAULT_SSH_PORT,
            timeout: DEFAULT_TIMEOUT,
            jobs: DEFAULT_JOBS,
            quiet: 0,
        }
    }
}
