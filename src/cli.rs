//! CLI command definitions.
//!
//! The `drs-config` binary is a thin inspection tool over the library:
//! it loads the layered configuration and prints resolved values.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and validate climate data reference syntax configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the default configuration file
    #[arg(long, global = true)]
    pub default_config: Option<PathBuf>,

    /// Path to the user configuration file
    #[arg(short = 'c', long, global = true)]
    pub user_config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration as sorted `key: value` lines
    Show {
        /// Only print keys matching this pattern
        pattern: Option<String>,

        /// Print as JSON instead of `key: value` lines
        #[arg(long)]
        json: bool,
    },

    /// Print one resolved configuration value
    Get {
        /// The configuration key to look up
        key: String,
    },

    /// Print project data reference syntax entries
    Projects {
        /// Limit output to one project
        name: Option<String>,
    },

    /// Load the configuration and report the outcome
    Validate,
}
