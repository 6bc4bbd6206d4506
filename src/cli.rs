//! Command-line interface for signtype
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Sign-language typing from a live camera
#[derive(Parser, Debug)]
#[command(name = "signtype", version, about = "Sign-language typing from a live camera")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-tick predictions)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Classifier to run: noop, demo, or scripted:<path.json>
    #[arg(long, value_name = "NAME")]
    pub classifier: Option<String>,

    /// Play a directory of image files instead of a camera
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// Replay the frames directory in a loop
    #[arg(long, requires = "frames")]
    pub loop_frames: bool,

    /// Use the built-in synthetic frame source
    #[arg(long, conflicts_with = "frames")]
    pub synthetic: bool,

    /// Stop after this long. Examples: 30s, 5m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_run_duration)]
    pub duration: Option<Duration>,
}

/// Parse a duration string.
///
/// Supports any format accepted by `humantime` plus bare numbers (seconds).
fn parse_run_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the synthetic source with the scripted demo classifier
    Demo {
        /// Stop after this long (default: 10s)
        #[arg(long, value_name = "DURATION", value_parser = parse_run_duration)]
        duration: Option<Duration>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
