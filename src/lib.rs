//! VideoGate Library
//!
//! Validates uploaded videos against a compatibility policy: a
//! filename-only container pre-check, plus a full check that probes the
//! bytes with ffprobe and applies codec, resolution and bitrate rules.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use adapters::FFprobeAdapter;
pub use app::ValidateInteractor;
pub use domain::errors::{DomainError, ProbeError};
pub use domain::model::{MediaInfo, QuickValidation, ValidationVerdict};
pub use domain::policy::CompatibilityPolicy;
pub use error::{VideoGateError, VideoGateResult};
pub use ports::MediaProber;
