//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` as a child process and reduces its JSON report to a
//! [`MediaInfo`]. The report is treated as an untyped tree: only the fields
//! the validator needs are read and anything missing becomes `None`.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::adapters::toml_config::ProbeConfig;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::path::PathUtils;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    binary: String,
    timeout: Duration,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Create adapter from the `[probe]` configuration section
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.ffprobe_path.clone(), config.timeout())
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Spawn ffprobe and wait for it, bounded by the configured timeout.
    ///
    /// The child is spawned with `kill_on_drop`, so when the timeout fires
    /// and the wait future is dropped the process is killed as well.
    async fn run(&self, path: &Path) -> Result<Output, ProbeError> {
        let child = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::NotFound {
                binary: self.binary.clone(),
                source,
            })?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(ProbeError::Timeout {
                after: self.timeout,
            }),
        }
    }
}

#[async_trait]
impl MediaProber for FFprobeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError> {
        debug!(binary = %self.binary, path = %path.display(), "Running ffprobe");
        let output = self.run(path).await?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let container = PathUtils::dotted_extension(&path.to_string_lossy());
        let info = parse_report(&output.stdout, &container)?;
        debug!(codec = %info.codec, width = ?info.width, height = ?info.height, bitrate = ?info.bitrate, "ffprobe report parsed");
        Ok(info)
    }
}

/// Reduce an ffprobe `-show_format -show_streams` JSON report to media info
pub fn parse_report(stdout: &[u8], container: &str) -> Result<MediaInfo, ProbeError> {
    let report: Value =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Parse(e.to_string()))?;

    let video = report
        .get("streams")
        .and_then(Value::as_array)
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.get("codec_type").and_then(Value::as_str) == Some("video"))
        });

    let codec = video
        .and_then(|s| non_empty_str(s, "codec_name").or_else(|| non_empty_str(s, "codec_tag_string")))
        .unwrap_or(UNKNOWN_CODEC);

    let format = report.get("format");
    let duration = format.and_then(|f| float_field(f, "duration"));
    let bitrate = format.and_then(|f| integer_field(f, "bit_rate"));
    let width = video.and_then(|s| integer_field(s, "width")).and_then(|w| u32::try_from(w).ok());
    let height = video.and_then(|s| integer_field(s, "height")).and_then(|h| u32::try_from(h).ok());

    Ok(MediaInfo::new(codec, container)
        .with_duration(duration)
        .with_dimensions(width, height)
        .with_bitrate(bitrate))
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ffprobe prints most numeric format fields as strings
fn float_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
