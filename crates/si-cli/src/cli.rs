//! Command-line argument definitions.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

/// Session inspector.
///
/// Reconstructs tool calls and their outcomes from coding assistant session
/// logs and reports on permissions, tool usage, timelines and failures.
#[derive(Debug, Parser)]
#[command(
    name = "si",
    version,
    about,
    long_about = None,
    after_help = "Examples:
  si summary -c
  si permissions -c
  si permissions -p fleet-plugins -r 5
  si errors -c -n 20
  si timeline -c -f dcg
  si tools -c"
)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Session selection and output flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectArgs {
    /// Path to the projects directory (overrides config).
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Session id (or prefix).
    #[arg(short, long)]
    pub session: Option<String>,

    /// Filter by project directory name (case-insensitive substring).
    #[arg(short, long)]
    pub project: Option<String>,

    /// Use the most recent session.
    #[arg(short, long)]
    pub current: bool,

    /// Analyse the N most recent sessions.
    #[arg(short, long, value_name = "N")]
    pub recent: Option<usize>,

    /// Show only the last N entries.
    #[arg(short = 'n', long, value_name = "N", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub last: Option<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Brief output (skip full tables).
    #[arg(short, long)]
    pub brief: bool,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Quick session summary.
    Summary(SelectArgs),

    /// Permission request analysis.
    Permissions(SelectArgs),

    /// Tool call frequency overview.
    Tools(SelectArgs),

    /// Chronological event timeline.
    Timeline {
        #[command(flatten)]
        select: SelectArgs,

        /// Filter events (case-insensitive text match).
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Errors, rejections and dcg blocks.
    Errors(SelectArgs),
}

impl Commands {
    pub const fn select(&self) -> &SelectArgs {
        match self {
            Self::Summary(select)
            | Self::Permissions(select)
            | Self::Tools(select)
            | Self::Errors(select)
            | Self::Timeline { select, .. } => select,
        }
    }
}
