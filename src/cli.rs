// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vsi")]
#[command(about = "Deploy and check the Venafi machine identity functions for Snowflake on AWS")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (default: ~/.vsi/config.yaml)
    #[arg(short, long, global = true, env = "VSI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with the given AWS settings
    Config {
        /// AWS access key id
        #[arg(long, requires = "access_key")]
        access_key_id: Option<String>,

        /// AWS secret access key
        #[arg(long, requires = "access_key_id")]
        access_key: Option<String>,

        /// Named AWS profile instead of static keys
        #[arg(long, conflicts_with_all = ["access_key_id", "access_key"])]
        profile: Option<String>,

        /// AWS region for every resource
        #[arg(long)]
        zone: Option<String>,

        /// Bucket holding credentials and deployment info
        #[arg(long)]
        bucket: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Report the health of every managed resource
    Status {
        /// Print the full status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create or repair everything that is missing or broken
    Install,
}
