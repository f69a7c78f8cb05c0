use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// uspin - build the package set of a Solus image from a .spin file
#[derive(Parser)]
#[command(name = "uspin")]
#[command(about = "Load .spin image specifications and apply their package operations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a .spin file and its package list
    Validate {
        /// Path to the .spin file
        spec: PathBuf,
    },
    /// Show the package manager calls a .spin file would make
    Plan {
        /// Path to the .spin file
        spec: PathBuf,

        /// Print the calls as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a .spin file's operations into a target root
    Build {
        /// Path to the .spin file
        spec: PathBuf,

        /// Image root the packages are installed into
        #[arg(short, long)]
        root: PathBuf,

        /// eopkg binary to run
        #[arg(long, default_value = "eopkg")]
        eopkg: PathBuf,

        /// Dry-run mode: log the package manager calls without making changes.
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
