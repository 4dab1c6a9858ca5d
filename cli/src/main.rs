mod commands;
mod terminal;

use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use commands::{CommandLine, Commands, config, run, upload};
use terminal::{logging, print};

/// How long blocking workers still stuck on a dead host may delay exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let commands = match CommandLine::try_parse() {
        Ok(commands) => commands,
        Err(err) => return usage_or_exit(err),
    };

    logging::init_logging(commands.verbose);

    let cfg = commands.config();
    print::banner(cfg.quiet);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = match commands.command {
        Commands::Config(args) => config::config(args, &cfg),
        Commands::Run(args) => runtime.block_on(run::run(args, &cfg)),
        Commands::Upload(args) => runtime.block_on(upload::upload(args, &cfg)),
    };
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    outcome
}

/// A missing or unknown subcommand shows the usage page and exits cleanly. Any other
/// parse failure exits non-zero with clap's own message.
fn usage_or_exit(err: clap::Error) -> anyhow::Result<()> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print()?;
            Ok(())
        }
        ErrorKind::MissingSubcommand
        | ErrorKind::InvalidSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            CommandLine::command().print_help()?;
            Ok(())
        }
        _ => err.exit(),
    }
}
