//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Verdict output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Policy output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyFormat {
    Toml,
    Json,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Video files or directories (walked recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Original upload file name to validate a single input under
    #[arg(long)]
    pub name: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// File names to pre-check
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the policy command
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "toml")]
    pub format: PolicyFormat,
}

/// Probe timeout in whole seconds, 1 to 600
pub fn parse_probe_timeout(s: &str) -> Result<u64, String> {
    clap_num::number_range(s, 1, 600)
}
