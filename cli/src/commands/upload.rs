use anyhow::anyhow;

use orchestrate_common::config::Config;
use orchestrate_common::fleet::operation::{Operation, UploadSource};

use crate::commands::UploadArgs;
use crate::commands::report::run_batch;

pub async fn upload(args: UploadArgs, cfg: &Config) -> anyhow::Result<()> {
    let source = upload_source(args.file, args.directory)?;
    let operation = Operation::Transfer {
        source,
        destination: args.destination,
    };
    run_batch(&args.selection, &operation, cfg).await
}

fn upload_source(
    file: Option<std::path::PathBuf>,
    directory: Option<std::path::PathBuf>,
) -> anyhow::Result<UploadSource> {
    match (file, directory) {
        (Some(file), None) => Ok(UploadSource::File(file)),
        (None, Some(dir)) => Ok(UploadSource::Directory(dir)),
        _ => Err(anyhow!("give exactly one of --file or --directory")),
    }
}
