//! Scoped temporary copies of uploaded buffers
//!
//! ffprobe needs a real file, so each validation stages its buffer in a
//! uniquely named file that is removed when the guard goes out of scope.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::TempPath;
use tracing::{debug, warn};

/// Random characters appended after the timestamp prefix
const RANDOM_TOKEN_LEN: usize = 12;

/// Longest extension, dot excluded, carried into the staged file name
const MAX_SUFFIX_LEN: usize = 16;

/// Temp file owned by exactly one validation call.
///
/// The file is deleted on drop, which covers early returns, errors from the
/// prober and cancellation of the enclosing future. Deletion failures are
/// logged and never propagated.
#[derive(Debug)]
pub struct ScopedTempFile {
    path: PathBuf,
    inner: Option<TempPath>,
}

impl ScopedTempFile {
    /// Create a file named `videogate-<utc timestamp>-<random><extension>`
    /// in `dir` (or the process temp dir) and write `buffer` to it.
    ///
    /// The extension is kept because ffprobe uses it as a format hint, but
    /// only when [`staging_suffix`] accepts it.
    pub async fn stage(buffer: &[u8], extension: &str, dir: Option<&Path>) -> io::Result<Self> {
        let prefix = format!("videogate-{}-", Utc::now().format("%Y%m%dT%H%M%S%3f"));
        let mut builder = tempfile::Builder::new();
        builder
            .prefix(&prefix)
            .suffix(staging_suffix(extension))
            .rand_bytes(RANDOM_TOKEN_LEN);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        // Close our handle so the prober is the only reader
        let temp_path = file.into_temp_path();
        let guard = Self {
            path: temp_path.to_path_buf(),
            inner: Some(temp_path),
        };

        tokio::fs::write(&guard.path, buffer).await?;
        debug!(path = %guard.path.display(), bytes = buffer.len(), "Staged upload for probing");

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete now and report the outcome instead of logging it
    pub fn close(mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(temp_path) => temp_path.close(),
            None => Ok(()),
        }
    }
}

/// Client-supplied extension reduced to something safe in a file name.
///
/// Returns `extension` when it is a dot followed by 1 to 16 ASCII
/// alphanumerics, otherwise an empty suffix.
pub fn staging_suffix(extension: &str) -> &str {
    match extension.strip_prefix('.') {
        Some(ext)
            if !ext.is_empty()
                && ext.len() <= MAX_SUFFIX_LEN
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            extension
        }
        _ => "",
    }
}

impl Drop for ScopedTempFile {
    fn drop(&mut self) {
        if let Some(temp_path) = self.inner.take() {
            if let Err(e) = temp_path.close() {
                warn!(path = %self.path.display(), error = %e, "Failed to remove temporary upload copy");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_writes_buffer_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let staged = ScopedTempFile::stage(b"fake video", ".mp4", Some(dir.path()))
            .await
            .unwrap();

        let name = staged.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("videogate-"));
        assert!(name.ends_with(".mp4"));
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"fake video");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = ScopedTempFile::stage(b"x", ".webm", Some(dir.path())).await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_close_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staged = ScopedTempFile::stage(b"x", "", Some(dir.path())).await.unwrap();
        let path = staged.path().to_path_buf();

        staged.close().unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_stages_never_share_a_path() {
        let dir = tempfile::tempdir().unwrap();
        let (a, b) = tokio::join!(
            ScopedTempFile::stage(b"a", ".mp4", Some(dir.path())),
            ScopedTempFile::stage(b"b", ".mp4", Some(dir.path())),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read(a.path()).unwrap(), b"a");
        assert_eq!(std::fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn test_staging_suffix() {
        assert_eq!(staging_suffix(".mp4"), ".mp4");
        assert_eq!(staging_suffix(".m2ts"), ".m2ts");
        assert_eq!(staging_suffix(""), "");
        assert_eq!(staging_suffix("."), "");
        assert_eq!(staging_suffix("mp4"), "");
        assert_eq!(staging_suffix(".m\0p4"), "");
        assert_eq!(staging_suffix(".mp4/.."), "");
        assert_eq!(staging_suffix(&format!(".{}", "x".repeat(17))), "");
        assert_eq!(staging_suffix(&format!(".{}", "x".repeat(16))).len(), 17);
    }

    #[tokio::test]
    async fn test_unsafe_extension_is_staged_without_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let long = format!(".{}", "x".repeat(300));
        let staged = ScopedTempFile::stage(b"x", &long, Some(dir.path())).await.unwrap();

        let name = staged.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("videogate-"));
        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(ScopedTempFile::stage(b"x", ".mp4", Some(&missing)).await.is_err());
    }
}
