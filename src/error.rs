use thiserror::Error;

pub const NETWORK_UNREACHABLE: &str = "network unreachable, check your connection";
pub const NETWORK_TIMEOUT: &str = "network unreachable: request timed out";
pub const INVALID_CREDENTIALS: &str = "invalid credentials, check the API key";
pub const ACCESS_DENIED: &str = "access denied, check API permissions";
pub const RATE_LIMITED: &str = "rate limited, retry later";
pub const UPSTREAM_ERROR: &str = "upstream server error, retry later";
pub const MALFORMED_RESPONSE: &str = "malformed response: no image returned";
pub const SIMULATED_UNAVAILABLE: &str = "simulated service unavailable";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Response(String),
    #[error("{0}")]
    Simulated(String),
    /// Friendly, caller-facing failure produced by [`ImageGenError::classify`].
    #[error("{0}")]
    Generation(String),
}

impl ImageGenError {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageGenError::Config(_) => "Config",
            ImageGenError::Encoding(_) => "Encoding",
            ImageGenError::Network(_) => "Network",
            ImageGenError::Timeout(_) => "Timeout",
            ImageGenError::Http { .. } => "Http",
            ImageGenError::Response(_) => "Response",
            ImageGenError::Simulated(_) => "Simulated",
            ImageGenError::Generation(_) => "Generation",
        }
    }

    /// Collapses any failure into a `Generation` error carrying the message
    /// shown to the user. Never retries.
    pub fn classify(self) -> ImageGenError {
        let message = match self {
            ImageGenError::Generation(msg) => msg,
            ImageGenError::Network(_) => NETWORK_UNREACHABLE.to_string(),
            ImageGenError::Timeout(_) => NETWORK_TIMEOUT.to_string(),
            ImageGenError::Http { status: 401, .. } => INVALID_CREDENTIALS.to_string(),
            ImageGenError::Http { status: 403, .. } => ACCESS_DENIED.to_string(),
            ImageGenError::Http { status: 429, .. } => RATE_LIMITED.to_string(),
            ImageGenError::Http { status, .. } if (500..600).contains(&status) => {
                UPSTREAM_ERROR.to_string()
            }
            ImageGenError::Http { message, .. } => message,
            ImageGenError::Encoding(msg) => format!("image processing failed: {}", msg),
            ImageGenError::Config(msg)
            | ImageGenError::Response(msg)
            | ImageGenError::Simulated(msg) => msg,
        };
        ImageGenError::Generation(message)
    }
}

impl From<reqwest::Error> for ImageGenError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ImageGenError::Timeout(err.to_string())
        } else {
            ImageGenError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ImageGenError>;
