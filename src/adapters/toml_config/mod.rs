// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::tracing_log::LoggingConfig;
use crate::domain::policy::CompatibilityPolicy;
use crate::error::{VideoGateError, VideoGateResult};

pub const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Candidate config files, checked in order when no path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["config/videogate.toml", "videogate.toml"];

/// `[probe]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// ffprobe executable, looked up on PATH unless absolute
    pub ffprobe_path: String,
    pub timeout_secs: u64,
    /// Where upload copies are staged; the process temp dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,
    /// Upper bound on concurrent validations in batch mode; CPU count when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: DEFAULT_FFPROBE_PATH.to_string(),
            timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            temp_dir: None,
            max_parallel: None,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn parallelism(&self) -> usize {
        self.max_parallel.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub probe: ProbeConfig,
    pub logging: LoggingConfig,
    pub policy: CompatibilityPolicy,
}

impl AppConfig {
    /// Normalize the policy tables and check every section
    pub fn finalize(mut self) -> VideoGateResult<Self> {
        self.policy = self.policy.normalized();
        self.policy.validate()?;

        if self.probe.timeout_secs == 0 {
            return Err(VideoGateError::Config {
                message: "probe.timeout_secs must be at least 1".to_string(),
            });
        }
        if self.probe.ffprobe_path.trim().is_empty() {
            return Err(VideoGateError::Config {
                message: "probe.ffprobe_path must not be empty".to_string(),
            });
        }
        self.logging.validate()?;

        Ok(self)
    }
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse configuration from TOML text; missing keys keep defaults
    pub fn parse(content: &str) -> VideoGateResult<AppConfig> {
        toml::from_str(content).map_err(|e| VideoGateError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> VideoGateResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| VideoGateError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// First existing file among the default locations
    pub fn find_default_file() -> Option<PathBuf> {
        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Load an explicit file, else the first default file, else defaults
    pub fn load(explicit: Option<&Path>) -> VideoGateResult<AppConfig> {
        match explicit {
            Some(path) => Self::load_file(path),
            None => match Self::find_default_file() {
                Some(path) => Self::load_file(&path),
                None => {
                    debug!("No configuration file found, using defaults");
                    Ok(AppConfig::default())
                }
            },
        }
    }

    /// Serialize configuration (or just the policy) back to TOML
    pub fn to_toml_string<T: Serialize>(value: &T) -> VideoGateResult<String> {
        toml::to_string_pretty(value).map_err(|e| VideoGateError::Config {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}
