use orchestrate_common::config::Config;
use orchestrate_common::fleet::operation::Operation;

use crate::commands::RunArgs;
use crate::commands::report::run_batch;

pub async fn run(args: RunArgs, cfg: &Config) -> anyhow::Result<()> {
    let operation = Operation::Command {
        command: args.command,
        elevated: args.sudo,
    };
    run_batch(&args.selection, &operation, cfg).await
}
