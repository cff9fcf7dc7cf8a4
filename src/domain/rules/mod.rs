// Domain rules - Compatibility checks applied to an upload

use crate::domain::model::*;
use crate::domain::policy::{CodecFamily, CompatibilityPolicy};
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// How the policy classifies a container extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerClass {
    /// Should have been transcoded upstream; tolerated with a warning
    AutoConvertible,
    /// Disqualifying on its own
    Blocked,
    Supported,
    /// Neither supported nor blocked
    Unrecognized,
}

/// Outcome of the container gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerOutcome {
    /// Continue with codec inspection
    Continue,
    /// Stop: the container alone rejects the upload
    Rejected,
}

/// How the policy classifies a probed codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecClass {
    /// Contains a blocked substring (the matched entry is kept)
    Blocked(String),
    Supported,
    Unrecognized,
}

/// Container rules
pub struct ContainerRules;

impl ContainerRules {
    /// Auto-convertible wins over blocked so that a missed conversion is an
    /// operational warning rather than a user-facing rejection.
    pub fn classify(extension: &str, policy: &CompatibilityPolicy) -> ContainerClass {
        if policy.is_auto_convertible(extension) {
            ContainerClass::AutoConvertible
        } else if policy.is_blocked_container(extension) {
            ContainerClass::Blocked
        } else if policy.is_supported_container(extension) {
            ContainerClass::Supported
        } else {
            ContainerClass::Unrecognized
        }
    }

    /// Apply the container gate to `verdict`
    pub fn apply(
        extension: &str,
        policy: &CompatibilityPolicy,
        verdict: &mut ValidationVerdict,
    ) -> ContainerOutcome {
        match Self::classify(extension, policy) {
            ContainerClass::AutoConvertible => {
                verdict.warn(format!(
                    "{} files are expected to be converted to MP4 before validation, but this file reached validation unconverted. It may not play on all devices.",
                    display_extension(extension)
                ));
                ContainerOutcome::Continue
            }
            ContainerClass::Blocked => {
                verdict.reject(format!(
                    "{} container format is not supported. Please convert your video to MP4 with the H.264 codec.",
                    display_extension(extension)
                ));
                ContainerOutcome::Rejected
            }
            ContainerClass::Supported => ContainerOutcome::Continue,
            ContainerClass::Unrecognized => {
                verdict.warn(format!(
                    "{} container may have compatibility issues. MP4 with the H.264 codec is recommended.",
                    display_extension(extension)
                ));
                ContainerOutcome::Continue
            }
        }
    }
}

/// Codec rules
pub struct CodecRules;

impl CodecRules {
    /// Blocked takes precedence over supported
    pub fn classify(codec: &str, policy: &CompatibilityPolicy) -> CodecClass {
        if let Some(entry) = policy.blocked_codec_match(codec) {
            CodecClass::Blocked(entry.to_string())
        } else if policy.supported_codec_match(codec).is_some() {
            CodecClass::Supported
        } else {
            CodecClass::Unrecognized
        }
    }

    /// Apply codec checks for a successfully probed upload
    pub fn apply(info: &MediaInfo, policy: &CompatibilityPolicy, verdict: &mut ValidationVerdict) {
        let codec = info.codec.to_lowercase();
        match Self::classify(&codec, policy) {
            CodecClass::Blocked(_) => {
                verdict.reject(format!(
                    "Video codec \"{}\" is not supported on mobile devices. Please re-encode to H.264: {}",
                    codec, policy.reencode_command
                ));
                for family in CodecFamily::detect(&codec) {
                    verdict.reject(family_caveat(family));
                }
            }
            CodecClass::Supported => {}
            CodecClass::Unrecognized => {
                verdict.warn(format!(
                    "Video codec \"{}\" is not recognized and may not play on all devices. H.264 is recommended.",
                    codec
                ));
            }
        }
    }

    /// Warning used when the codec could not be inspected at all
    pub fn unverified_warning(policy: &CompatibilityPolicy) -> String {
        format!(
            "Could not verify the video codec. If playback fails on mobile devices, re-encode to H.264: {}",
            policy.reencode_command
        )
    }
}

fn family_caveat(family: CodecFamily) -> &'static str {
    match family {
        CodecFamily::Dolby => {
            "Dolby Vision video requires hardware decoding support that most devices lack. Export as standard H.264 instead."
        }
        CodecFamily::Hevc => {
            "HEVC/H.265 video does not play on many Android devices. Export as H.264 instead."
        }
        CodecFamily::ProRes => {
            "ProRes is an Apple professional editing format and is not suitable for streaming. Export as H.264 instead."
        }
    }
}

/// Resolution and bitrate advisories
pub struct QualityRules;

impl QualityRules {
    pub fn apply(info: &MediaInfo, policy: &CompatibilityPolicy, verdict: &mut ValidationVerdict) {
        if let Some((width, height)) = info.dimensions() {
            if width > policy.max_width || height > policy.max_height {
                verdict.warn(format!(
                    "Video resolution {}x{} exceeds {}x{}. 1080p (1920x1080) is recommended for streaming.",
                    width, height, policy.max_width, policy.max_height
                ));
            }
        }

        if let Some(bitrate) = info.bitrate {
            if bitrate > policy.max_bitrate {
                verdict.warn(format!(
                    "Video bitrate of {}Mbps is very high. 5-10 Mbps is recommended for streaming.",
                    Utils::bitrate_to_mbps(bitrate)
                ));
            }
        }
    }
}

/// Filename-only gate run before any I/O
pub fn quick_validate(file_name: &str, policy: &CompatibilityPolicy) -> QuickValidation {
    let extension = PathUtils::dotted_extension(file_name);
    match ContainerRules::classify(&extension, policy) {
        ContainerClass::Blocked => QuickValidation::reject(format!(
            "{} files are not supported. Please convert your video to MP4 with the H.264 codec.",
            display_extension(&extension)
        )),
        _ => QuickValidation::accept(),
    }
}

fn display_extension(extension: &str) -> String {
    if extension.is_empty() {
        "Unknown".to_string()
    } else {
        extension.to_uppercase()
    }
}
