use crate::{
    error::Result,
    media::SourceImage,
    models::{GenerationOptions, GenerationResult, HistoryRecord, ServiceStatus},
};
use async_trait::async_trait;

/// One way of fulfilling generation jobs. Implementations return raw,
/// unclassified errors; [`crate::generator::ImageGenerator`] owns
/// classification and the degrade-to-empty policy.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn provider(&self) -> &str;

    fn model(&self) -> &str;

    async fn generate(
        &self,
        image: &SourceImage,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult>;

    async fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>>;

    /// `Ok(None)` when the id is unknown.
    async fn result_by_id(&self, result_id: &str) -> Result<Option<String>>;

    async fn check_status(&self) -> ServiceStatus;
}
