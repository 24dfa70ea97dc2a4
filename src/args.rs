//! CLI argument definitions for r2-explorer.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Browse and manage objects in Cloudflare R2 buckets.
///
/// Credentials come from a JSON config file (`--config`) with
/// `ACCOUNT_ID`, `CLIENT_ACCESS_KEY` and `CLIENT_SECRET`, or from the
/// `R2_ACCOUNT_ID`, `R2_ACCESS_KEY_ID` and `R2_SECRET_ACCESS_KEY`
/// environment variables.
#[derive(Parser, Debug)]
#[command(name = "r2-explorer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(short, long, env = "R2_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity: -v = Info, -vv = Debug
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List bucket names
    Buckets,

    /// List the objects of a bucket as a tree
    Ls {
        bucket: String,

        /// Print one key per line instead of a tree
        #[arg(long)]
        flat: bool,
    },

    /// Print a presigned download URL (valid for one hour)
    Url { bucket: String, key: String },

    /// Delete an object
    Rm { bucket: String, key: String },

    /// Download an object to a local file
    Get {
        bucket: String,
        key: String,

        /// Destination path (defaults to the key's file name)
        destination: Option<PathBuf>,
    },

    /// Upload a local file
    Put {
        bucket: String,
        file: PathBuf,

        /// Object key (defaults to the file's base name)
        #[arg(long)]
        key: Option<String>,
    },

    /// Show storage used per bucket and in total
    Usage {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
