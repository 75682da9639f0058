use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "permap",
    about = "Parse permission-to-method maps with source/sink annotations",
    version,
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Log parser diagnostics at debug level (overrides PERMAP_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a permission map and write it out in another format
    Parse(ParseArgs),
    /// Summarize a permission map and report lines that did not parse
    Check(CheckArgs),
    /// List all supported output formats
    ListFormats,
    /// Print a shell completion script to stdout
    Completion {
        /// Shell to generate for: bash, zsh, fish, powershell, elvish
        shell: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    /// Permission map file
    pub file: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ~/.permap/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Union the permissions of lines that share a signature
    #[arg(long, default_value_t = false)]
    pub merge_duplicates: bool,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Permission map file
    pub file: PathBuf,

    /// Config file (defaults to ~/.permap/config.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit with a failure status when any line was skipped
    #[arg(long, default_value_t = false)]
    pub strict: bool,
}
