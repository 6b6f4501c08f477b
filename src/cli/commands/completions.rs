//! Completions command - shell completion scripts for `vitrine`

use crate::cli::Cli;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Write the completion script for `shell` to `out`
pub fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.output {
        Some(path) => {
            let mut file = File::create(&path)
                .map_err(|e| format!("Cannot write '{}': {e}", path.display()))?;
            write_script(args.shell, &mut file);
            file.flush()?;
        }
        None => write_script(args.shell, &mut io::stdout()),
    }
    Ok(())
}
