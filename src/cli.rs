use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ralsh")]
#[command(version)]
#[command(about = "Manage system resources through scripted providers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a provider's attribute schema
    Describe {
        /// Path to the provider script
        script: PathBuf,
    },

    /// List all resources the provider knows about
    List {
        /// Path to the provider script
        script: PathBuf,
    },

    /// Look up one resource by name
    Find {
        /// Path to the provider script
        script: PathBuf,

        /// Resource name
        name: String,
    },

    /// Apply desired attribute values to a resource
    Set {
        /// Path to the provider script
        script: PathBuf,

        /// Resource name
        name: String,

        /// Desired values as attr=value pairs
        #[arg(required = true)]
        attrs: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
