//! Codec and container compatibility policy
//!
//! The tables below describe what plays reliably on the mobile client
//! population. They are plain data: operators override any of them from the
//! `[policy]` table of the config file without touching the rules.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::utils::path::PathUtils;

/// Codecs known to play reliably on target clients
pub const SUPPORTED_CODECS: &[&str] = &["h264", "avc1", "avc", "vp8", "vp9"];

/// Codecs rejected for hardware, licensing or compatibility reasons
pub const BLOCKED_CODECS: &[&str] = &[
    "hevc", "hev1", "h265", "dolby", "dvhe", "dvh1", "av1", "av01", "prores", "dnxhd", "dnxhr",
    "mjpeg", "mpeg4", "wmv", "vc1",
];

pub const SUPPORTED_CONTAINERS: &[&str] = &[".mp4", ".m4v", ".webm"];

pub const BLOCKED_CONTAINERS: &[&str] = &[".mov", ".avi", ".wmv", ".mkv", ".flv", ".3gp"];

/// Containers an upstream stage transcodes to MP4 before validation
pub const AUTO_CONVERTIBLE_EXTENSIONS: &[&str] = &[".mov", ".avi", ".mkv", ".wmv"];

pub const DEFAULT_MAX_WIDTH: u32 = 3840;
pub const DEFAULT_MAX_HEIGHT: u32 = 2160;
pub const DEFAULT_MAX_BITRATE: u64 = 20_000_000;

pub const DEFAULT_REENCODE_COMMAND: &str =
    "ffmpeg -i input.mov -c:v libx264 -preset medium -crf 23 -c:a aac -b:a 128k output.mp4";

/// Codec families that get an extra, more specific rejection message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFamily {
    Dolby,
    Hevc,
    ProRes,
}

impl CodecFamily {
    pub const ALL: [CodecFamily; 3] = [CodecFamily::Dolby, CodecFamily::Hevc, CodecFamily::ProRes];

    /// Substrings identifying the family in a lower-cased codec name
    pub fn markers(&self) -> &'static [&'static str] {
        match self {
            CodecFamily::Dolby => &["dolby", "dvh"],
            CodecFamily::Hevc => &["hevc", "h265", "hev1"],
            CodecFamily::ProRes => &["prores"],
        }
    }

    /// Families whose markers occur in `codec`, in declaration order
    pub fn detect(codec: &str) -> Vec<CodecFamily> {
        let codec = codec.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .filter(|family| family.markers().iter().any(|m| codec.contains(m)))
            .collect()
    }
}

/// Named, swappable compatibility tables and advisory thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityPolicy {
    pub supported_codecs: Vec<String>,
    pub blocked_codecs: Vec<String>,
    pub supported_containers: Vec<String>,
    pub blocked_containers: Vec<String>,
    pub auto_convertible_extensions: Vec<String>,
    pub max_width: u32,
    pub max_height: u32,
    /// Bits per second above which a bitrate advisory is emitted
    pub max_bitrate: u64,
    /// Remediation shown alongside codec errors and probe failures
    pub reencode_command: String,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for CompatibilityPolicy {
    fn default() -> Self {
        Self {
            supported_codecs: owned(SUPPORTED_CODECS),
            blocked_codecs: owned(BLOCKED_CODECS),
            supported_containers: owned(SUPPORTED_CONTAINERS),
            blocked_containers: owned(BLOCKED_CONTAINERS),
            auto_convertible_extensions: owned(AUTO_CONVERTIBLE_EXTENSIONS),
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            max_bitrate: DEFAULT_MAX_BITRATE,
            reencode_command: DEFAULT_REENCODE_COMMAND.to_string(),
        }
    }
}

impl CompatibilityPolicy {
    /// Lower-case every entry and give extensions a leading dot
    pub fn normalized(mut self) -> Self {
        let codecs = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect()
        };
        let extensions = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|e| PathUtils::normalize_extension(&e))
                .filter(|e| !e.is_empty())
                .collect()
        };

        self.supported_codecs = codecs(self.supported_codecs);
        self.blocked_codecs = codecs(self.blocked_codecs);
        self.supported_containers = extensions(self.supported_containers);
        self.blocked_containers = extensions(self.blocked_containers);
        self.auto_convertible_extensions = extensions(self.auto_convertible_extensions);
        self
    }

    /// Reject a policy the engine cannot work with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.supported_containers.is_empty() {
            return Err(DomainError::InvalidPolicy(
                "supported_containers must not be empty".to_string(),
            ));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(DomainError::InvalidPolicy(
                "max_width and max_height must be positive".to_string(),
            ));
        }
        if self.max_bitrate == 0 {
            return Err(DomainError::InvalidPolicy(
                "max_bitrate must be positive".to_string(),
            ));
        }
        if let Some(ext) = self
            .supported_containers
            .iter()
            .find(|ext| contains_ignore_case(&self.blocked_containers, ext))
        {
            return Err(DomainError::InvalidPolicy(format!(
                "container {} is both supported and blocked",
                ext
            )));
        }
        Ok(())
    }

    pub fn is_supported_container(&self, extension: &str) -> bool {
        contains_ignore_case(&self.supported_containers, extension)
    }

    pub fn is_blocked_container(&self, extension: &str) -> bool {
        contains_ignore_case(&self.blocked_containers, extension)
    }

    pub fn is_auto_convertible(&self, extension: &str) -> bool {
        contains_ignore_case(&self.auto_convertible_extensions, extension)
    }

    /// First blocked entry occurring as a substring of `codec`
    pub fn blocked_codec_match(&self, codec: &str) -> Option<&str> {
        substring_match(&self.blocked_codecs, codec)
    }

    /// First supported entry occurring as a substring of `codec`
    pub fn supported_codec_match(&self, codec: &str) -> Option<&str> {
        substring_match(&self.supported_codecs, codec)
    }
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    !value.is_empty() && list.iter().any(|entry| entry.eq_ignore_ascii_case(value))
}

fn substring_match<'a>(list: &'a [String], codec: &str) -> Option<&'a str> {
    let codec = codec.to_lowercase();
    list.iter()
        .map(String::as_str)
        .find(|entry| !entry.is_empty() && codec.contains(&entry.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let policy = CompatibilityPolicy::default();
        assert_eq!(policy.supported_codecs.len(), 5);
        assert_eq!(policy.blocked_codecs.len(), 15);
        assert_eq!(policy.max_width, 3840);
        assert_eq!(policy.max_height, 2160);
        assert_eq!(policy.max_bitrate, 20_000_000);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_container_membership_is_case_insensitive() {
        let policy = CompatibilityPolicy::default();
        assert!(policy.is_supported_container(".MP4"));
        assert!(policy.is_blocked_container(".Mkv"));
        assert!(policy.is_auto_convertible(".MOV"));
        assert!(!policy.is_auto_convertible(".flv"));
        assert!(!policy.is_supported_container(""));
    }

    #[test]
    fn test_codec_matching_is_substring_based() {
        let policy = CompatibilityPolicy::default();
        assert_eq!(policy.blocked_codec_match("hevc_main10"), Some("hevc"));
        assert_eq!(policy.blocked_codec_match("DVHE.05"), Some("dvhe"));
        assert_eq!(policy.blocked_codec_match("h264"), None);
        assert_eq!(policy.supported_codec_match("avc1.64001f"), Some("avc1"));
        assert_eq!(policy.supported_codec_match("theora"), None);
    }

    #[test]
    fn test_codec_family_detection() {
        assert_eq!(CodecFamily::detect("hevc"), vec![CodecFamily::Hevc]);
        assert_eq!(CodecFamily::detect("dvh1"), vec![CodecFamily::Dolby]);
        assert_eq!(CodecFamily::detect("prores_ks"), vec![CodecFamily::ProRes]);
        assert!(CodecFamily::detect("av1").is_empty());
    }

    #[test]
    fn test_normalized_policy_from_loose_input() {
        let policy = CompatibilityPolicy {
            supported_containers: vec!["MP4".to_string(), " .webm".to_string(), "".to_string()],
            blocked_codecs: vec!["HEVC".to_string()],
            ..CompatibilityPolicy::default()
        }
        .normalized();

        assert_eq!(policy.supported_containers, vec![".mp4", ".webm"]);
        assert_eq!(policy.blocked_codecs, vec!["hevc"]);
    }

    #[test]
    fn test_validate_rejects_unusable_policy() {
        let empty = CompatibilityPolicy {
            supported_containers: Vec::new(),
            ..CompatibilityPolicy::default()
        };
        assert!(matches!(empty.validate(), Err(DomainError::InvalidPolicy(_))));

        let zero = CompatibilityPolicy {
            max_bitrate: 0,
            ..CompatibilityPolicy::default()
        };
        assert!(zero.validate().is_err());

        let overlap = CompatibilityPolicy {
            blocked_containers: vec![".mp4".to_string()],
            ..CompatibilityPolicy::default()
        };
        assert!(overlap.validate().is_err());
    }
}
