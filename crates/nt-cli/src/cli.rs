//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Nudgy timer.
///
/// Records what you spent your time on and tells you where it went.
#[derive(Debug, Parser)]
#[command(name = "nt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record an event.
    Add {
        /// When the event started (ISO 8601 or relative, e.g. "2 hours ago").
        #[arg(long)]
        start: String,

        /// When the event ended. Defaults to now.
        #[arg(long)]
        end: Option<String>,

        /// What you were doing. Defaults to the description of the most recent event.
        description: Option<String>,
    },

    /// List events in a time window.
    Events {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// Show time spent per activity, longest first.
    Summary {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the activity that took the most time.
    Top {
        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the most recently started event.
    Recent {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show database status.
    Status,
}

/// Time window shared by the query commands.
///
/// Without any flag the window covers all recorded time.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// Only consider today, in local time.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub day: bool,

    /// Start of the window (ISO 8601 or relative, e.g. "1 week ago").
    #[arg(long)]
    pub start: Option<String>,

    /// End of the window, exclusive (ISO 8601 or relative).
    #[arg(long)]
    pub end: Option<String>,
}
