use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "streamify")]
#[command(author, version, about = "Turn a single video into an adaptive-bitrate HLS stream")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory for job workspaces (overrides config and STREAMIFY_MEDIA_ROOT)
    #[arg(long, global = true)]
    pub media_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transcode one video into an HLS bitrate ladder
    Run {
        /// Job name; sanitized to [A-Za-z0-9.-] and used as the workspace directory
        #[arg(short, long)]
        name: String,

        /// Local file path or URL of the source video
        #[arg(short, long)]
        input: String,

        /// Output width in pixels
        #[arg(short = 'W', long)]
        width: u32,

        /// Output height in pixels
        #[arg(short = 'H', long)]
        height: u32,

        /// Comma-separated video bitrates in kbps, e.g. 500,1000,2500
        #[arg(short, long)]
        bitrates: String,

        /// Encode up to N variants at once (overrides segmenter.max_parallel)
        #[arg(short = 'j', long)]
        parallel: Option<usize>,

        /// Print the job report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default search if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
