// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::ProbeError;
use crate::domain::model::MediaInfo;

/// Port for media file probing.
///
/// Implementations inspect a file on disk and report the first video
/// stream. `container` is derived from the path's extension.
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Probe media file and return normalized information
    async fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError>;
}
