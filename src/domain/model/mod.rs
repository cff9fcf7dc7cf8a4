// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

/// Codec name used when the prober reports no usable identifier
pub const UNKNOWN_CODEC: &str = "unknown";

/// Normalized description of a probed upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// Lower-cased codec identifier of the first video stream
    pub codec: String,
    /// Extension supplied with the upload, e.g. `.mp4`
    pub container: String,
    /// Container-level duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Container-level bit rate in bits per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

impl MediaInfo {
    /// Create media info for a codec and container; the codec is lower-cased
    pub fn new(codec: impl Into<String>, container: impl Into<String>) -> Self {
        let codec = codec.into().trim().to_lowercase();
        Self {
            codec: if codec.is_empty() {
                UNKNOWN_CODEC.to_string()
            } else {
                codec
            },
            container: container.into(),
            duration: None,
            width: None,
            height: None,
            bitrate: None,
        }
    }

    /// Set duration; non-positive or non-finite values are dropped
    pub fn with_duration(mut self, duration: Option<f64>) -> Self {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        self
    }

    /// Set frame dimensions; zero values are dropped
    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width.filter(|w| *w > 0);
        self.height = height.filter(|h| *h > 0);
        self
    }

    /// Set bit rate; zero is dropped
    pub fn with_bitrate(mut self, bitrate: Option<u64>) -> Self {
        self.bitrate = bitrate.filter(|b| *b > 0);
        self
    }

    /// True when the prober could not name the codec
    pub fn is_codec_unknown(&self) -> bool {
        self.codec == UNKNOWN_CODEC
    }

    /// Both dimensions, when both were reported
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Aggregated result of validating one upload.
///
/// Blocking problems are recorded with [`ValidationVerdict::reject`], which
/// is the only way to clear `is_valid`, so an invalid verdict always carries
/// at least one error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationVerdict {
    is_valid: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_info: Option<MediaInfo>,
}

impl ValidationVerdict {
    /// Fresh verdict: valid, no findings
    pub fn new() -> Self {
        Self {
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            media_info: None,
        }
    }

    /// Record a non-blocking advisory
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record a blocking error and mark the verdict invalid
    pub fn reject(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    /// Attach the probe result
    pub fn set_media_info(&mut self, media_info: MediaInfo) {
        self.media_info = Some(media_info);
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn media_info(&self) -> Option<&MediaInfo> {
        self.media_info.as_ref()
    }

    /// True when the upload may be stored but the caller should surface notices
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if !self.is_valid {
            "rejected"
        } else if self.has_warnings() {
            "accepted with warnings"
        } else {
            "accepted"
        };
        write!(
            f,
            "{} ({} errors, {} warnings)",
            status,
            self.errors.len(),
            self.warnings.len()
        )
    }
}

/// Result of the filename-only pre-check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuickValidation {
    pub fn accept() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}
