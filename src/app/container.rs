use std::sync::Arc;

use crate::adapters::toml_config::AppConfig;
use crate::adapters::FFprobeAdapter;
use crate::app::validate_interactor::ValidateInteractor;
use crate::error::VideoGateResult;
use crate::ports::MediaProber;

pub trait AppContainer: Send + Sync {
    fn validate_interactor(&self) -> Arc<ValidateInteractor>;
    fn config(&self) -> &AppConfig;
}

pub struct DefaultAppContainer {
    config: AppConfig,
    validate_interactor: Arc<ValidateInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe adapter and policy from a finalized configuration
    pub fn new(config: AppConfig) -> VideoGateResult<Self> {
        let probe_port = Arc::new(FFprobeAdapter::from_config(&config.probe));
        Self::with_prober(config, probe_port)
    }

    /// Wire a caller-supplied prober, used by embedding services and tests
    pub fn with_prober(config: AppConfig, probe_port: Arc<dyn MediaProber>) -> VideoGateResult<Self> {
        let config = config.finalize()?;
        let policy = Arc::new(config.policy.clone());

        let validate_interactor = Arc::new(
            ValidateInteractor::new(probe_port, policy)
                .with_temp_dir(config.probe.temp_dir.clone())
                .with_max_parallel(config.probe.parallelism()),
        );

        Ok(Self {
            config,
            validate_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn validate_interactor(&self) -> Arc<ValidateInteractor> {
        Arc::clone(&self.validate_interactor)
    }

    fn config(&self) -> &AppConfig {
        &self.config
    }
}
