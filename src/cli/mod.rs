//! CLI module for ytnotes.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// ytnotes - Study notes from YouTube videos
///
/// Fetches a video's captions, asks a hosted language model to turn them into
/// structured notes, and renders the notes as PDF. Run `ytnotes serve` for the
/// HTTP API used by the web frontend.
#[derive(Parser, Debug)]
#[command(name = "ytnotes")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate notes for a video
    Notes {
        /// YouTube URL or video ID
        url: String,

        /// Note style (comprehensive, summary, detailed, bullet_points)
        #[arg(short, long)]
        style: Option<String>,

        /// Write notes to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Also render the notes to this PDF file
        #[arg(long)]
        pdf: Option<String>,
    },

    /// Print a video's transcript
    Transcript {
        /// YouTube URL or video ID
        url: String,
    },

    /// Render a notes file as PDF
    Pdf {
        /// Markdown notes file
        file: String,

        /// Document title
        #[arg(short, long)]
        title: String,

        /// Source video URL, printed under the title
        #[arg(long)]
        url: Option<String>,

        /// Output file (defaults to a name derived from the title)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the available note styles
    Styles,

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}
