//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::adapters::tracing_log::{LogFormat, LogLevel};
use crate::cli::Cli;

pub const ENV_FFPROBE_PATH: &str = "VIDEOGATE_FFPROBE_PATH";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "VIDEOGATE_PROBE_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "VIDEOGATE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "VIDEOGATE_LOG_FORMAT";
pub const ENV_TEMP_DIR: &str = "VIDEOGATE_TEMP_DIR";

/// Build the effective configuration: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<AppConfig> {
    let mut config = TomlConfigAdapter::load(cli.config.as_deref())?;

    let env_overrides = apply_environment_overrides(&mut config, |key| std::env::var(key).ok())?;
    let cli_overrides = apply_cli_overrides(&mut config, cli)?;
    debug!(env_overrides, cli_overrides, "Configuration hierarchy resolved");

    Ok(config.finalize()?)
}

/// Apply `VIDEOGATE_*` variables, returning how many were set
pub fn apply_environment_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(path) = lookup(ENV_FFPROBE_PATH) {
        config.probe.ffprobe_path = path;
        applied += 1;
    }
    if let Some(secs) = lookup(ENV_PROBE_TIMEOUT_SECS) {
        config.probe.timeout_secs = secs
            .trim()
            .parse()
            .with_context(|| format!("{} must be a whole number of seconds, got {:?}", ENV_PROBE_TIMEOUT_SECS, secs))?;
        applied += 1;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        LogLevel::parse(&level)?;
        config.logging.level = level;
        applied += 1;
    }
    if let Some(format) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = LogFormat::parse(&format)?;
        applied += 1;
    }
    if let Some(dir) = lookup(ENV_TEMP_DIR) {
        config.probe.temp_dir = Some(PathBuf::from(dir));
        applied += 1;
    }

    Ok(applied)
}

/// Apply global command-line options, returning how many were given
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> Result<usize> {
    let mut applied = 0;

    if let Some(level) = &cli.log_level {
        LogLevel::parse(level)?;
        config.logging.level = level.clone();
        applied += 1;
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = LogFormat::parse(format)?;
        applied += 1;
    }
    if let Some(path) = &cli.ffprobe {
        config.probe.ffprobe_path = path.clone();
        applied += 1;
    }
    if let Some(secs) = cli.probe_timeout {
        config.probe.timeout_secs = secs;
        applied += 1;
    }

    Ok(applied)
}
