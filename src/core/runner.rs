//! Application runner logic
//!
//! Dispatches the parsed subcommand onto the pipeline.

use crate::core::cli::{CliArgs, Command};
use crate::core::config_file::ConfigFile;
use crate::logging;
use crate::pipeline;
use anyhow::Result;
use tracing::info;

/// Run the subcommand selected on the command line.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    let _log_guard = logging::init(cli_args.verbose, cli_args.log_file)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli_args.command {
        Command::Init { path } => {
            if ConfigFile::initialize_project(&path)? {
                println!("Created project configuration: {}", path.display());
            } else {
                println!("Project configuration already exists: {}", path.display());
            }
            Ok(())
        }
        Command::Generate(build) => {
            let config = build.resolve_config()?;
            let report = runtime.block_on(pipeline::generate(&config))?;
            info!("{}", report.summary());
            Ok(())
        }
        Command::Watch(watch) => {
            let config = watch.resolve_config()?;
            runtime.block_on(pipeline::watch(&config))
        }
    }
}
