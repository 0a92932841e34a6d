//! `wpack print-config`.

use std::io::Write;

use crate::cli::ProjectArgs;
use crate::commands::load_project;
use crate::error::Result;

/// Print the synthesized bundler configuration as pretty JSON on stdout.
pub fn execute(args: ProjectArgs) -> Result<()> {
    let project = load_project(&args)?;
    let config = project.config.synthesize(&project.root)?;

    let json = serde_json::to_string_pretty(&config)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
