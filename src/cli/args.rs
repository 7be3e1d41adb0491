// file: src/cli/args.rs
// version: 2.0.0
// guid: f6g7h8i9-j0k1-2345-6789-012345fghijk

//! Command line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cluster-config")]
#[command(about = "Validate, default and resolve Cortex cluster configurations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, help = "Abort if the command has not finished after this many seconds")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the configuration a cluster gets from file defaults alone
    Defaults {
        #[arg(short, long)]
        json: bool,
    },

    /// Validate a cluster config file and report every invalid field
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Resolve a cluster configuration interactively
    Configure {
        #[arg(short, long, help = "Cluster config file; defaults apply when omitted")]
        config: Option<PathBuf>,

        #[arg(long, help = "Do not re-prompt for fields the config file already sets")]
        skip_populated_fields: bool,

        #[arg(long, help = "Take the instance type from the config file only")]
        no_prompt_instance_type: bool,

        #[arg(long, env = "CORTEX_AWS_ACCOUNT_ID", help = "AWS account id used to derive the bucket name")]
        aws_account_id: Option<String>,

        #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
        api_version: String,

        #[arg(long)]
        operator_in_cluster: bool,

        #[arg(short, long, help = "Write the resolved configuration as YAML")]
        output: Option<PathBuf>,

        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}
