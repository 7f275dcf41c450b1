use crate::{
    error::{ImageGenError, Result, SIMULATED_UNAVAILABLE},
    generator::traits::ImageBackend,
    ids,
    media::SourceImage,
    models::{GenerationOptions, GenerationResult, HistoryRecord, ServiceStatus},
};
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::ops::Range;
use std::time::Duration;

pub const PROVIDER: &str = "doubao-mock";
pub const MOCK_ID_PREFIX: &str = "mock_";
pub const HISTORY_CAP: usize = 5;
pub const HISTORY_SPACING_MS: i64 = 60_000;

pub const PLACEHOLDER_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=1024&q=80",
    "https://images.unsplash.com/photo-1548013146-72479768bada?w=1024&q=80",
    "https://images.unsplash.com/photo-1539650116574-75c0c6d73f6e?w=1024&q=80",
    "https://images.unsplash.com/photo-1594736797933-d0401ba2fe65?w=1024&q=80",
    "https://images.unsplash.com/photo-1576020799627-aeac74d58064?w=1024&q=80",
    "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=1024&q=80",
];

const HISTORY_PHOTO_BASE: u64 = 1578662996442;

/// Offline stand-in for the Doubao API: sleeps, fails now and then, and
/// hands back stock imagery.
pub struct MockBackend {
    model: String,
    latency_ms: Range<u64>,
    failure_rate: f64,
}

impl MockBackend {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            latency_ms: 3000..5000,
            failure_rate: 0.05,
        }
    }

    pub fn with_latency(mut self, latency_ms: Range<u64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn without_latency(self) -> Self {
        self.with_latency(0..0)
    }

    /// Clamped to `[0.0, 1.0]`.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    fn pick_delay(&self) -> Duration {
        if self.latency_ms.is_empty() {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(self.latency_ms.clone()))
        }
    }

    pub fn mock_history(limit: usize) -> Vec<HistoryRecord> {
        let now = chrono::Utc::now().timestamp_millis();

        (0..limit.min(HISTORY_CAP))
            .map(|i| {
                let timestamp = now - i as i64 * HISTORY_SPACING_MS;
                let metadata = [
                    ("artStyle", json!("realistic")),
                    ("lighting", json!("golden_hour")),
                    ("season", json!("autumn")),
                ]
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect();

                HistoryRecord {
                    result_id: format!("{}{}_{}", MOCK_ID_PREFIX, timestamp, i),
                    image_url: format!(
                        "https://images.unsplash.com/photo-{}?w=400&q=80",
                        HISTORY_PHOTO_BASE + i as u64
                    ),
                    prompt: format!("Mock history entry {}", i + 1),
                    timestamp,
                    metadata,
                }
            })
            .collect()
    }

    pub fn mock_result_by_id(result_id: &str) -> Option<String> {
        result_id
            .starts_with(MOCK_ID_PREFIX)
            .then(|| PLACEHOLDER_IMAGES[0].to_string())
    }
}

#[async_trait]
impl ImageBackend for MockBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        _image: &SourceImage,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult> {
        let delay = self.pick_delay();
        log::debug!("Simulating generation latency of {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;

        let (image_url, failed) = {
            let mut rng = rand::thread_rng();
            (
                PLACEHOLDER_IMAGES[rng.gen_range(0..PLACEHOLDER_IMAGES.len())],
                rng.gen_bool(self.failure_rate),
            )
        };

        if failed {
            return Err(ImageGenError::Simulated(SIMULATED_UNAVAILABLE.into()));
        }

        let result = GenerationResult {
            image_url: image_url.to_string(),
            result_id: ids::new_result_id("mock"),
            prompt: prompt.to_string(),
            options: *options,
            timestamp: chrono::Utc::now().timestamp_millis(),
            model: self.model.clone(),
            size: options.size.to_string(),
        };

        log::info!("Mock generation produced {}", result.result_id);
        Ok(result)
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        Ok(Self::mock_history(limit))
    }

    async fn result_by_id(&self, result_id: &str) -> Result<Option<String>> {
        Ok(Self::mock_result_by_id(result_id))
    }

    async fn check_status(&self) -> ServiceStatus {
        ServiceStatus::ok(PROVIDER, &self.model, "running in simulation mode")
    }
}
