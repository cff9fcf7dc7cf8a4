// Validate interactor - Orchestrates the upload validation use case

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::adapters::temp_fs::ScopedTempFile;
use crate::domain::model::*;
use crate::domain::policy::CompatibilityPolicy;
use crate::domain::rules::*;
use crate::error::{VideoGateError, VideoGateResult};
use crate::ports::*;
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// Interactor for the upload validation use case.
///
/// Holds no per-call state: every call builds its own verdict and temp
/// file, so one instance can serve any number of concurrent uploads.
pub struct ValidateInteractor {
    prober: Arc<dyn MediaProber>,
    policy: Arc<CompatibilityPolicy>,
    temp_dir: Option<PathBuf>,
    max_parallel: usize,
}

impl ValidateInteractor {
    /// Create new validate interactor with injected prober and policy
    pub fn new(prober: Arc<dyn MediaProber>, policy: Arc<CompatibilityPolicy>) -> Self {
        Self {
            prober,
            policy,
            temp_dir: None,
            max_parallel: num_cpus::get().max(1),
        }
    }

    /// Stage upload copies in `dir` instead of the process temp dir
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Limit concurrent validations in [`ValidateInteractor::validate_many`]
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn policy(&self) -> &CompatibilityPolicy {
        &self.policy
    }

    /// Filename-only pre-check; never touches the disk
    pub fn quick_validate(&self, file_name: &str) -> QuickValidation {
        quick_validate(file_name, &self.policy)
    }

    /// Validate an uploaded buffer.
    ///
    /// Probe failures of any kind degrade to a warning. The only error
    /// returned is a failure to stage the temp copy, which callers should
    /// treat as a rejection.
    pub async fn validate_video(
        &self,
        buffer: &[u8],
        original_filename: &str,
    ) -> VideoGateResult<ValidationVerdict> {
        let extension = PathUtils::dotted_extension(original_filename);
        info!(
            file = %original_filename,
            size = %Utils::format_file_size(buffer.len() as u64),
            "Validating uploaded video"
        );

        let mut verdict = ValidationVerdict::new();

        if ContainerRules::apply(&extension, &self.policy, &mut verdict) == ContainerOutcome::Rejected {
            info!(file = %original_filename, container = %extension, "Rejected by container");
            return Ok(verdict);
        }

        let staged = ScopedTempFile::stage(buffer, &extension, self.temp_dir.as_deref())
            .await
            .map_err(VideoGateError::TempFile)?;
        let probed = self.prober.probe(staged.path()).await;
        drop(staged);

        match probed {
            Ok(mut media_info) => {
                media_info.container = extension;
                debug!(codec = %media_info.codec, "Probe succeeded");
                CodecRules::apply(&media_info, &self.policy, &mut verdict);
                QualityRules::apply(&media_info, &self.policy, &mut verdict);
                verdict.set_media_info(media_info);
            }
            Err(e) => {
                warn!(file = %original_filename, error = %e, "Codec could not be verified");
                verdict.warn(CodecRules::unverified_warning(&self.policy));
            }
        }

        info!(file = %original_filename, "Validation finished: {}", verdict);
        Ok(verdict)
    }

    /// Read a file from disk and validate it under its own file name
    pub async fn validate_file(&self, path: &Path) -> VideoGateResult<ValidationVerdict> {
        let file_name = PathUtils::file_name(path);
        let quick = self.quick_validate(&file_name);
        if !quick.valid {
            // Same verdict the full path would produce, without reading the file
            return self.validate_video(&[], &file_name).await;
        }

        let buffer = tokio::fs::read(path).await?;
        self.validate_video(&buffer, &file_name).await
    }

    /// Validate several files concurrently, results in input order
    pub async fn validate_many(
        self: Arc<Self>,
        paths: Vec<PathBuf>,
    ) -> Vec<(PathBuf, VideoGateResult<ValidationVerdict>)> {
        let permits = Arc::new(Semaphore::new(self.max_parallel));

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let interactor = Arc::clone(&self);
                let permits = Arc::clone(&permits);
                let task_path = path.clone();
                let handle = tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await.map_err(|e| {
                        VideoGateError::TaskFailed {
                            message: e.to_string(),
                        }
                    })?;
                    interactor.validate_file(&task_path).await
                });
                (path, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(VideoGateError::TaskFailed {
                    message: e.to_string(),
                }),
            };
            results.push((path, result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ProbeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProber {
        calls: AtomicUsize,
        codec: &'static str,
    }

    #[async_trait]
    impl MediaProber for CountingProber {
        async fn probe(&self, path: &Path) -> Result<MediaInfo, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MediaInfo::new(self.codec, PathUtils::dotted_extension(&path.to_string_lossy())))
        }
    }

    fn interactor(codec: &'static str) -> (Arc<CountingProber>, ValidateInteractor) {
        let prober = Arc::new(CountingProber {
            calls: AtomicUsize::new(0),
            codec,
        });
        let interactor = ValidateInteractor::new(
            Arc::clone(&prober) as Arc<dyn MediaProber>,
            Arc::new(CompatibilityPolicy::default()),
        );
        (prober, interactor)
    }

    #[tokio::test]
    async fn test_blocked_container_skips_probe() {
        let (prober, interactor) = interactor("h264");
        let verdict = interactor.validate_video(b"data", "clip.flv").await.unwrap();

        assert!(!verdict.is_valid());
        assert_eq!(verdict.errors().len(), 1);
        assert!(verdict.media_info().is_none());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_media_info_keeps_caller_extension() {
        let (prober, interactor) = interactor("h264");
        let verdict = interactor.validate_video(b"data", "Clip.M4V").await.unwrap();

        assert!(verdict.is_valid());
        assert_eq!(verdict.media_info().unwrap().container, ".m4v");
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_quick_validate_uses_policy() {
        let (_, interactor) = interactor("h264");
        assert!(interactor.quick_validate("clip.mp4").valid);
        assert!(!interactor.quick_validate("clip.3gp").valid);
    }

    #[tokio::test]
    async fn test_validate_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routine.webm");
        std::fs::write(&path, b"webm bytes").unwrap();

        let (prober, interactor) = interactor("vp9");
        let verdict = interactor.validate_file(&path).await.unwrap();

        assert!(verdict.is_valid());
        assert!(verdict.warnings().is_empty());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validate_file_missing_is_io_error() {
        let (_, interactor) = interactor("h264");
        let err = interactor
            .validate_file(Path::new("/nonexistent/clip.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, VideoGateError::IoError(_)));
    }

    #[tokio::test]
    async fn test_validate_many_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["a.mp4", "b.flv", "c.webm", "d.mov"];
        let paths: Vec<PathBuf> = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, name.as_bytes()).unwrap();
                path
            })
            .collect();

        let (_, interactor) = interactor("h264");
        let results = Arc::new(interactor.with_max_parallel(2))
            .validate_many(paths.clone())
            .await;

        let returned: Vec<PathBuf> = results.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(returned, paths);
        let validity: Vec<bool> = results
            .iter()
            .map(|(_, r)| r.as_ref().unwrap().is_valid())
            .collect();
        assert_eq!(validity, vec![true, false, true, true]);
    }
}
