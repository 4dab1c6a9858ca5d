pub mod config;
pub mod report;
pub mod run;
pub mod upload;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgGroup, Args, Parser, Subcommand};

use orchestrate_common::config::{
    Config, DEFAULT_JOBS, DEFAULT_REGISTRY, DEFAULT_SSH_PORT, DEFAULT_TIMEOUT,
};
use orchestrate_common::fleet::selection::Selection;
use orchestrate_core::batch::BatchRunner;
use orchestrate_core::fleet::FleetService;
use orchestrate_core::ssh::SshConnector;
use orchestrate_core::store::JsonRegistryStore;

#[derive(Parser)]
#[command(name = "orchestrate")]
#[command(about = "Run commands and push files across a fleet of SSH hosts.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Path of the JSON target registry
    #[arg(long, global = true, default_value = DEFAULT_REGISTRY)]
    pub registry: PathBuf,

    /// SSH port used for every target
    #[arg(long, global = true, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Per-target time limit in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Number of targets worked on at the same time
    #[arg(long, short = 'j', global = true, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Less decoration; repeat to print only the summary
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// More logging; repeat for trace output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add, remove or list registered targets
    #[command(alias = "c")]
    Config(ConfigArgs),
    /// Run a shell command on the selected targets
    #[command(alias = "r")]
    Run(RunArgs),
    /// Copy a local file to the selected targets
    #[command(alias = "u")]
    Upload(UploadArgs),
}

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["add", "remove", "list"])))]
pub struct ConfigArgs {
    /// Register a target given as user:pass@ip
    #[arg(short, long, value_name = "USER:PASS@IP")]
    pub add: Option<String>,

    /// Separate password for sudo on the target being added
    #[arg(
        long,
        requires = "add",
        conflicts_with_all = ["remove", "list"],
        value_name = "PASSWORD"
    )]
    pub sudo_password: Option<String>,

    /// Unregister the target with this IP
    #[arg(short, long, value_name = "IP")]
    pub remove: Option<String>,

    /// List registered targets
    #[arg(short, long)]
    pub list: bool,
}

#[derive(Args)]
pub struct SelectionArgs {
    /// One target IP
    #[arg(short = 't', long = "target", value_name = "IP")]
    pub single: Option<String>,

    /// Several target IPs, space separated
    #[arg(short = 'T', long = "targets", value_name = "\"IP1 IP2\"")]
    pub many: Option<String>,

    /// Every registered target
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Command line to execute remotely
    #[arg(short = 'x', long = "exec", value_name = "COMMAND")]
    pub command: String,

    /// Run through sudo
    #[arg(short, long)]
    pub sudo: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "directory"])))]
pub struct UploadArgs {
    /// Local file to upload
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Local directory to upload
    #[arg(short = 'F', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Remote destination; a trailing `/` keeps the local file name
    #[arg(short, long, value_name = "PATH")]
    pub destination: String,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl CommandLine {
    pub fn config(&self) -> Config {
        Config {
            registry: self.registry.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout),
            jobs: self.jobs,
            quiet: self.quiet,
        }
    }
}

/// Wires the registry file and the SSH connector described by `cfg` into a service.
pub fn fleet_service(cfg: &Config, runner: BatchRunner) -> FleetService {
    FleetService::new(
        Box::new(JsonRegistryStore::new(cfg.registry.clone())),
        Arc::new(SshConnector::from(cfg)),
        runner,
    )
}

impl From<&SelectionArgs> for Selection {
    fn from(args: &SelectionArgs) -> Self {
        Selection {
            single: args.single.clone(),
            many: args.many.clone(),
            all: args.all,
        }
    }
}
