use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hourcast",
    version,
    about = "Hour-by-hour weather preview with task windows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test the forecast endpoint
    Check,
    /// Print today's hours, task windows and alerts without the TUI
    Preview {
        /// Display name for an ad-hoc location
        #[arg(long)]
        name: Option<String>,

        /// Latitude in decimal degrees
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude in decimal degrees
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<String>,
    },
    /// Allow or forbid tasks in unsuitable hours
    AllowUnsuitable {
        #[arg(action = clap::ArgAction::Set)]
        value: bool,
    },
}
