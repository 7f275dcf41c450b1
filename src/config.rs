use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/images/generations";
pub const DEFAULT_MODEL: &str = "doubao-seedream-4-5-251128";
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Retry settings handed to callers. The generator itself never retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

/// Object-storage upload placeholders. Kept so deployments can carry the
/// settings; image transport always uses embedded data URIs.
#[derive(Debug, Clone, Default)]
pub struct UploadConfig {
    pub endpoint: Option<String>,
    pub storage_service: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
}

impl UploadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        UploadConfig {
            endpoint: env::var("UPLOAD_ENDPOINT").ok(),
            storage_service: env::var("STORAGE_SERVICE").ok(),
            region: env::var("TOS_REGION").ok(),
            bucket: env::var("TOS_BUCKET").ok(),
            access_key_id: env::var("TOS_ACCESS_KEY_ID").ok(),
            access_key_secret: env::var("TOS_ACCESS_KEY_SECRET").ok(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_bucket(mut self, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self.bucket = Some(bucket.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub mock_mode: bool,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub upload: UploadConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            mock_mode: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("DOUBAO_API_KEY").ok().filter(|key| !key.is_empty());
        let model = env::var("DOUBAO_MODEL").unwrap_or(defaults.model);
        let endpoint = env::var("DOUBAO_API_URL").unwrap_or(defaults.endpoint);
        let mock_mode = env::var("MOCK_MODE").ok().map_or(false, |val| val == "true");
        let timeout = env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);
        let max_retries = env::var("MAX_RETRIES")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(defaults.retry.max_retries);
        let retry_delay = env::var("RETRY_DELAY_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry.retry_delay);

        GeneratorConfig {
            api_key,
            model,
            endpoint,
            mock_mode,
            timeout,
            retry: RetryPolicy {
                max_retries,
                retry_delay,
            },
            upload: UploadConfig::from_env(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = upload;
        self
    }

    /// The key with everything but its first four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let visible: String = key.chars().take(4).collect();
                format!("{}****", visible)
            }
            None => "<unset>".to_string(),
        }
    }
}
