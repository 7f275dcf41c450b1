use crate::{
    config::GeneratorConfig,
    error::{ImageGenError, Result, MALFORMED_RESPONSE},
    generator::traits::ImageBackend,
    ids,
    media::{encoder, SourceImage},
    models::{
        api_error_message, GenerationOptions, GenerationRequest, GenerationResponse, GenerationResult,
        HistoryRecord, ImageSize, ProbeRequest, ResponseFormat, ResultLookupResponse,
        ServiceStatus,
    },
};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Response, StatusCode, Url,
};

pub const PROVIDER: &str = "doubao";

/// 1x1 transparent PNG.
const PROBE_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Volcengine Ark images/generations backend.
pub struct DoubaoBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl DoubaoBackend {
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ImageGenError::Config("DOUBAO_API_KEY is required when mock mode is off".into())
            })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageGenError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| ImageGenError::Config("API key contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// `<endpoint>/result/<id>` with the id escaped as a single path segment.
    fn result_url(&self, result_id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| ImageGenError::Config(format!("invalid endpoint {}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| ImageGenError::Config(format!("endpoint {} has no path", self.endpoint)))?
            .pop_if_empty()
            .push("result")
            .push(result_id);
        Ok(url)
    }

    /// Structured error message first, then the status line. Raw body text
    /// is only surfaced when the body is not JSON at all.
    async fn error_from_response(response: Response) -> ImageGenError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::error!("Doubao API returned {}: {}", status, body);

        let message = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(parsed) => api_error_message(&parsed),
            Err(_) => Some(body.trim().to_string()).filter(|text| !text.is_empty()),
        }
        .unwrap_or_else(|| status_line(status));

        ImageGenError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

fn status_line(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

fn preview(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() > max_chars {
        format!("{}...", prompt.chars().take(max_chars).collect::<String>())
    } else {
        prompt.to_string()
    }
}

#[async_trait]
impl ImageBackend for DoubaoBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        image: &SourceImage,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GenerationResult> {
        log::info!(
            "Processing source image {} ({}KB, {})",
            image.name,
            image.size / 1024,
            image.mime_type
        );
        let encoded = encoder::encode(image).await?;

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            image: encoded,
            sequential_image_generation: options.sequential_generation,
            response_format: ResponseFormat::Url,
            size: options.size,
            stream: false,
            watermark: options.watermark,
        };

        log::info!(
            "Sending generation request to {} (model: {}, size: {}, watermark: {}, prompt: {})",
            self.endpoint,
            self.model,
            request.size,
            request.watermark,
            preview(prompt, 100)
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        log::debug!("Doubao API responded with {}", response.status());

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let bytes = response.bytes().await?;
        let parsed: GenerationResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ImageGenError::Response(format!("invalid response body: {}", e)))?;

        let image_url = parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                log::error!("Doubao API response carried no image URL");
                ImageGenError::Response(MALFORMED_RESPONSE.into())
            })?;

        let result = GenerationResult {
            image_url,
            result_id: ids::new_result_id(PROVIDER),
            prompt: prompt.to_string(),
            options: *options,
            timestamp: chrono::Utc::now().timestamp_millis(),
            model: self.model.clone(),
            size: request.size.to_string(),
        };

        log::info!(
            "Image generated: {} (model: {}, size: {})",
            result.result_id,
            result.model,
            result.size
        );

        Ok(result)
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let response = self
            .client
            .get(format!("{}/history", self.endpoint))
            .headers(self.build_headers()?)
            .query(&[("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageGenError::Http {
                status: response.status().as_u16(),
                message: status_line(response.status()),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ImageGenError::Response(format!("invalid history body: {}", e)))
    }

    async fn result_by_id(&self, result_id: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.result_url(result_id)?)
            .headers(self.build_headers()?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ImageGenError::Http {
                status: response.status().as_u16(),
                message: status_line(response.status()),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ResultLookupResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ImageGenError::Response(format!("invalid result body: {}", e)))?;

        Ok(parsed.image_url)
    }

    async fn check_status(&self) -> ServiceStatus {
        let probe = ProbeRequest {
            model: self.model.clone(),
            prompt: "test prompt".to_string(),
            image: PROBE_IMAGE.to_string(),
            size: ImageSize::OneK,
            stream: false,
        };

        let headers = match self.build_headers() {
            Ok(headers) => headers,
            Err(e) => return ServiceStatus::error(PROVIDER, &self.model, e.to_string()),
        };

        match self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&probe)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                ServiceStatus::ok(PROVIDER, &self.model, "Doubao API is reachable")
            }
            Ok(response) => {
                let status = response.status();
                let message = response
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|body| body.pointer("/error/message")?.as_str().map(str::to_string))
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                ServiceStatus::error(PROVIDER, &self.model, message)
            }
            Err(e) => {
                log::error!("Doubao status check failed: {}", e);
                ServiceStatus::error(PROVIDER, &self.model, e.to_string())
            }
        }
    }
}
