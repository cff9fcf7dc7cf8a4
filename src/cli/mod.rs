//! CLI module for VideoGate
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// VideoGate upload validator
///
/// Checks video uploads against the codec and container compatibility
/// policy before they are stored.
#[derive(Parser, Debug)]
#[command(name = "videogate")]
#[command(about = "VideoGate - Codec and container compatibility checks for video uploads")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "VIDEOGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Path to the ffprobe executable
    #[arg(long, global = true)]
    pub ffprobe: Option<String>,

    /// Seconds to wait for ffprobe before giving up (1-600)
    #[arg(long, global = true, value_parser = args::parse_probe_timeout)]
    pub probe_timeout: Option<u64>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fully validate video files (container, codec, resolution, bitrate)
    Validate(args::ValidateArgs),
    /// Filename-only pre-check, no file access
    Check(args::CheckArgs),
    /// Print the effective compatibility policy
    Policy(args::PolicyArgs),
}
