//! Command-line interface definition.
//!
//! - `wpack build` - synthesize the bundler configuration and build it
//! - `wpack print-config` - print the synthesized configuration as JSON

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// wpack - bundle a service's functions with Rolldown
#[derive(Parser, Debug)]
#[command(
    name = "wpack",
    version,
    about = "Bundle a service's functions with Rolldown",
    long_about = "wpack reads the functions declared in wpack.toml, wpack.json or the `wpack`\n\
                  field of package.json, derives one entry per function and builds them\n\
                  into the project's output folder."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every function of the project
    Build(BuildArgs),

    /// Print the synthesized bundler configuration without building
    PrintConfig(ProjectArgs),
}

/// Where the project lives and how its output folder is named.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project file to load instead of discovering one
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Output folder name, relative to the project directory
    #[arg(long, value_name = "NAME")]
    pub folder: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the build hash
    #[arg(long)]
    pub hash: bool,

    /// Print chunk ids in the asset table
    #[arg(long)]
    pub chunks: bool,

    /// Print the wpack version in the report
    #[arg(long)]
    pub show_version: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_flags() {
        let cli = Cli::try_parse_from([
            "wpack",
            "build",
            "--config",
            "svc/wpack.toml",
            "--folder",
            "dist",
            "--hash",
            "--show-version",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.project.config, Some(PathBuf::from("svc/wpack.toml")));
        assert_eq!(args.project.folder.as_deref(), Some("dist"));
        assert!(args.hash);
        assert!(!args.chunks);
        assert!(args.show_version);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["wpack", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn print_config_takes_project_args() {
        let cli = Cli::try_parse_from(["wpack", "print-config", "--cwd", "/srv/app"]).unwrap();
        let Command::PrintConfig(args) = cli.command else {
            panic!("expected print-config");
        };
        assert_eq!(args.cwd, Some(PathBuf::from("/srv/app")));
    }
}
