//! wpack binary entry point: parse arguments, set up logging, dispatch.

use clap::Parser;
use miette::Result;
use wpack_cli::commands::build::Output;
use wpack_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => {
            let output = Output {
                quiet: args.quiet,
                no_color: args.no_color,
            };
            commands::build_execute(build_args, output).await
        }
        cli::Command::PrintConfig(project_args) => commands::print_config_execute(project_args),
    };

    result.map_err(error::cli_error_to_miette)
}
