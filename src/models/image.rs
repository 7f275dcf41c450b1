use crate::models::options::{ImageSize, SequentialGeneration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "b64_json")]
    Base64,
}

/// Request body for the images/generations endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub image: String,
    pub sequential_image_generation: SequentialGeneration,
    pub response_format: ResponseFormat,
    pub size: ImageSize,
    pub stream: bool,
    pub watermark: bool,
}

/// Smallest payload the endpoint accepts; used to probe liveness.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRequest {
    pub model: String,
    pub prompt: String,
    pub image: String,
    pub size: ImageSize,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub data: Option<Vec<GeneratedImage>>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

/// Message carried by an error body shaped `{"error": {"message": ...}}` or
/// `{"message": ...}`. Any other JSON shape yields `None`.
pub fn api_error_message(body: &serde_json::Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(|message| message.as_str())
        .filter(|message| !message.is_empty())
        .or_else(|| body.get("message").and_then(|message| message.as_str()))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultLookupResponse {
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = GenerationRequest {
            model: "doubao-seedream-4-5-251128".into(),
            prompt: "a terracotta warrior".into(),
            image: "data:image/png;base64,AAAA".into(),
            sequential_image_generation: SequentialGeneration::Disabled,
            response_format: ResponseFormat::Url,
            size: ImageSize::TwoK,
            stream: false,
            watermark: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sequential_image_generation"], "disabled");
        assert_eq!(value["response_format"], "url");
        assert_eq!(value["size"], "2K");
        assert_eq!(value["stream"], false);
        assert_eq!(value["watermark"], true);
    }

    #[test]
    fn test_error_body_message_precedence() {
        let nested = json!({ "error": { "message": "nested", "code": "x" }, "message": "flat" });
        assert_eq!(api_error_message(&nested).as_deref(), Some("nested"));

        let flat = json!({ "message": "flat" });
        assert_eq!(api_error_message(&flat).as_deref(), Some("flat"));

        let empty_nested = json!({ "error": { "message": "" }, "message": "flat" });
        assert_eq!(api_error_message(&empty_nested).as_deref(), Some("flat"));

        for unexpected in [
            json!({ "error": {} }),
            json!({ "error": "bad request" }),
            json!({ "message": 42 }),
            json!(["x"]),
            json!(null),
        ] {
            assert_eq!(api_error_message(&unexpected), None, "{}", unexpected);
        }
    }
}
