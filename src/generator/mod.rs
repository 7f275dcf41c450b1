pub mod doubao;
pub mod mock;
pub mod traits;

use crate::{
    capabilities,
    config::{GeneratorConfig, RetryPolicy},
    error::{ImageGenError, Result},
    logger,
    media::SourceImage,
    models::{
        GenerationOptions, GenerationResult, HistoryRecord, ModelInfo, ServiceStatus, SizeInfo,
        ValidationResult,
    },
};
use std::sync::Arc;

pub use doubao::DoubaoBackend;
pub use mock::MockBackend;
pub use traits::ImageBackend;

/// Entry point for generation jobs. Build one per process from the loaded
/// configuration and hand clones to whoever needs it.
#[derive(Clone)]
pub struct ImageGenerator {
    backend: Arc<dyn ImageBackend>,
    retry: RetryPolicy,
}

impl ImageGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let backend: Arc<dyn ImageBackend> = if config.mock_mode {
            Arc::new(MockBackend::new(config.model.clone()))
        } else {
            Arc::new(DoubaoBackend::new(config)?)
        };

        log::info!(
            "Image generator ready (provider: {}, model: {})",
            backend.provider(),
            backend.model()
        );

        Ok(Self {
            backend,
            retry: config.retry.clone(),
        })
    }

    pub fn with_backend(backend: Arc<dyn ImageBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
        }
    }

    pub fn provider(&self) -> &str {
        self.backend.provider()
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Configured retry settings. Nothing in this crate acts on them.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Any failure comes back as [`ImageGenError::Generation`] with a
    /// user-facing message.
    pub async fn generate(
        &self,
        image: &SourceImage,
        prompt: &str,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        if prompt.trim().is_empty() {
            return Err(self.report(ImageGenError::Generation("prompt must not be empty".into())));
        }

        let _timer = logger::timer("image generation");
        self.backend
            .generate(image, prompt, &options)
            .await
            .map_err(|err| self.report(err))
    }

    pub async fn history(&self, limit: usize) -> Vec<HistoryRecord> {
        match self.backend.history(limit).await {
            Ok(records) => records,
            Err(err) => {
                log::warn!("Failed to fetch generation history [{}]: {}", err.kind(), err);
                Vec::new()
            }
        }
    }

    /// `None` covers both unknown ids and an unreachable service.
    pub async fn result_by_id(&self, result_id: &str) -> Option<String> {
        match self.backend.result_by_id(result_id).await {
            Ok(url) => url,
            Err(err) => {
                log::warn!("Failed to fetch result {} [{}]: {}", result_id, err.kind(), err);
                None
            }
        }
    }

    pub async fn check_status(&self) -> ServiceStatus {
        let status = self.backend.check_status().await;
        log::debug!("Service status: {:?}", status);
        status
    }

    pub fn recommended_params(&self, scenario: &str) -> GenerationOptions {
        capabilities::recommended_params(scenario)
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        capabilities::supported_models()
    }

    pub fn supported_sizes() -> Vec<SizeInfo> {
        capabilities::supported_sizes()
    }

    pub fn validate_image_file(file: &SourceImage) -> ValidationResult {
        capabilities::validate_image_file(file)
    }

    fn report(&self, err: ImageGenError) -> ImageGenError {
        log::error!(
            "Image generation failed via {} [{}]: {} ({:?})",
            self.backend.provider(),
            err.kind(),
            err,
            err
        );
        err.classify()
    }
}
