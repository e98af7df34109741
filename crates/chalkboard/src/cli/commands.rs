//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chalkboard - narrated whiteboard lessons from source text
#[derive(Parser, Debug)]
#[command(name = "chalkboard")]
#[command(about = "Turn source text into narrated, illustrated whiteboard lessons", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Per-stage provider overrides (JSON `AiAgentsConfig`)
    #[arg(long, global = true)]
    pub provider_config: Option<PathBuf>,

    /// Configuration file used instead of the standard search path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract teachable topics from a text file
    Analyze {
        /// Source text file
        #[arg(long)]
        input: PathBuf,
    },

    /// Plan the five illustrations for a topic
    Prompts {
        /// Topic text file
        #[arg(long)]
        topic: PathBuf,
    },

    /// Plan and synthesize the illustrations for a topic
    Assets {
        /// Topic text file
        #[arg(long)]
        topic: PathBuf,

        /// Output directory
        #[arg(long)]
        out: PathBuf,
    },

    /// Direct and narrate a lesson over existing assets
    Lesson {
        /// Topic text file
        #[arg(long)]
        topic: PathBuf,

        /// Number of assets available (asset_0 .. asset_{n-1})
        #[arg(long, default_value = "5")]
        assets: usize,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Narration API key for this run
        #[arg(long)]
        narration_key: Option<String>,
    },

    /// Run the whole pipeline on a text file
    Run {
        /// Source text file
        #[arg(long)]
        input: PathBuf,

        /// Which extracted topic to build
        #[arg(long, default_value = "0")]
        topic_index: usize,

        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Narration API key for this run
        #[arg(long)]
        narration_key: Option<String>,
    },
}
