//! End-to-end tests for the Doubao backend against a wiremock server.

use histoframe::{
    error::{
        ACCESS_DENIED, INVALID_CREDENTIALS, MALFORMED_RESPONSE, NETWORK_TIMEOUT,
        NETWORK_UNREACHABLE, RATE_LIMITED, UPSTREAM_ERROR,
    },
    media::decode_data_uri,
    models::StatusKind,
    GenerationOptions, GeneratorConfig, ImageGenError, ImageGenerator, ImageSize, SourceImage,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_PATH: &str = "/api/v3/images/generations";
const API_KEY: &str = "test-api-key";

fn generator_for(server: &MockServer) -> ImageGenerator {
    let config = GeneratorConfig::new()
        .with_api_key(API_KEY)
        .with_endpoint(format!("{}{}", server.uri(), API_PATH))
        .with_timeout(Duration::from_secs(5));
    ImageGenerator::new(&config).unwrap()
}

fn portrait() -> SourceImage {
    SourceImage::from_bytes("portrait.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47, 1, 2, 3])
}

fn portrait_options() -> GenerationOptions {
    GenerationOptions::new(ImageSize::OneK, false)
}

async fn generate_error(server: &MockServer) -> ImageGenError {
    generator_for(server)
        .generate(&portrait(), "Tang dynasty emperor", portrait_options())
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "model": "doubao-seedream-4-5-251128",
            "prompt": "Tang dynasty emperor",
            "sequential_image_generation": "disabled",
            "response_format": "url",
            "size": "1K",
            "stream": false,
            "watermark": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "doubao-seedream-4-5-251128",
            "created": 1757321139,
            "data": [
                { "url": "https://ark-results.example.com/first.jpeg", "size": "1024x1024" },
                { "url": "https://ark-results.example.com/second.jpeg", "size": "1024x1024" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = generator_for(&server)
        .generate(&portrait(), "Tang dynasty emperor", portrait_options())
        .await
        .unwrap();

    assert_eq!(result.image_url, "https://ark-results.example.com/first.jpeg");
    assert!(result.result_id.starts_with("doubao_"));
    assert_eq!(result.prompt, "Tang dynasty emperor");
    assert_eq!(result.options, portrait_options());
    assert_eq!(result.size, "1K");
    assert_eq!(result.model, "doubao-seedream-4-5-251128");
    assert!(result.timestamp > 0);
}

#[tokio::test]
async fn test_generate_sends_embedded_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "url": "https://ark-results.example.com/x.jpeg" }]
        })))
        .mount(&server)
        .await;

    generator_for(&server)
        .generate(&portrait(), "warrior", portrait_options())
        .await
        .unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let (mime, bytes) = decode_data_uri(body["image"].as_str().unwrap()).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, vec![0x89, 0x50, 0x4e, 0x47, 1, 2, 3]);
}

#[tokio::test]
async fn test_rate_limit_ignores_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Your account has reached its RPM limit", "code": "RateLimitExceeded" }
        })))
        .mount(&server)
        .await;

    let err = generate_error(&server).await;
    assert!(matches!(err, ImageGenError::Generation(_)));
    assert!(err.to_string().contains(RATE_LIMITED));
}

#[tokio::test]
async fn test_status_code_classification() {
    for (status, expected) in [
        (401u16, INVALID_CREDENTIALS),
        (403, ACCESS_DENIED),
        (500, UPSTREAM_ERROR),
        (502, UPSTREAM_ERROR),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .mount(&server)
            .await;

        assert_eq!(generate_error(&server).await.to_string(), expected, "status {}", status);
    }
}

#[tokio::test]
async fn test_other_errors_surface_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "The parameter `size` specified in the request is not valid", "code": "InvalidParameter" }
        })))
        .mount(&server)
        .await;

    assert_eq!(
        generate_error(&server).await.to_string(),
        "The parameter `size` specified in the request is not valid"
    );
}

#[tokio::test]
async fn test_error_message_fallbacks() {
    let flat = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "flat message" })))
        .mount(&flat)
        .await;
    assert_eq!(generate_error(&flat).await.to_string(), "flat message");

    let plain = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string("plain text failure"))
        .mount(&plain)
        .await;
    assert_eq!(generate_error(&plain).await.to_string(), "plain text failure");

    let empty = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&empty)
        .await;
    assert_eq!(generate_error(&empty).await.to_string(), "HTTP 404: Not Found");

    for body in [json!({ "error": "bad request" }), json!({ "message": 42 }), json!(["x"])] {
        let unexpected = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(body.clone()))
            .mount(&unexpected)
            .await;
        assert_eq!(
            generate_error(&unexpected).await.to_string(),
            "HTTP 400: Bad Request",
            "body {}",
            body
        );
    }
}

#[tokio::test]
async fn test_empty_data_is_malformed() {
    for body in [json!({ "data": [] }), json!({}), json!({ "data": [{ "b64_json": "AAAA" }] })] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        assert_eq!(generate_error(&server).await.to_string(), MALFORMED_RESPONSE);
    }
}

#[tokio::test]
async fn test_timeout_is_reported_as_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({ "data": [{ "url": "https://late.example.com" }] })),
        )
        .mount(&server)
        .await;

    let config = GeneratorConfig::new()
        .with_api_key(API_KEY)
        .with_endpoint(format!("{}{}", server.uri(), API_PATH))
        .with_timeout(Duration::from_millis(200));
    let err = ImageGenerator::new(&config)
        .unwrap()
        .generate(&portrait(), "p", portrait_options())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), NETWORK_TIMEOUT);
}

#[tokio::test]
async fn test_unreachable_host() {
    let config = GeneratorConfig::new()
        .with_api_key(API_KEY)
        .with_endpoint("http://127.0.0.1:1/api/v3/images/generations")
        .with_timeout(Duration::from_secs(2));
    let err = ImageGenerator::new(&config)
        .unwrap()
        .generate(&portrait(), "p", portrait_options())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), NETWORK_UNREACHABLE);
}

#[tokio::test]
async fn test_unreadable_image_is_prefixed() {
    let server = MockServer::start().await;
    let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    let source = SourceImage::from_path(file.path()).await.unwrap();
    drop(file);

    let err = generator_for(&server)
        .generate(&source, "p", portrait_options())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("image processing failed:"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_success_and_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/history", API_PATH)))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "resultId": "doubao_2_a", "imageUrl": "https://x/2.jpg", "prompt": "b", "timestamp": 2 },
            { "resultId": "doubao_1_a", "imageUrl": "https://x/1.jpg", "prompt": "a", "timestamp": 1 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/history", API_PATH)))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let generator = generator_for(&server);

    let history = generator.history(2).await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].result_id, "doubao_2_a");

    assert!(generator.history(50).await.is_empty());
}

#[tokio::test]
async fn test_history_with_unparseable_body_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/history", API_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(generator_for(&server).history(10).await.is_empty());
}

#[tokio::test]
async fn test_result_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/result/doubao_1_known", API_PATH)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "imageUrl": "https://x/known.jpg" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/result/doubao_1_missing", API_PATH)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/result/doubao_1_broken", API_PATH)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    assert_eq!(
        generator.result_by_id("doubao_1_known").await.as_deref(),
        Some("https://x/known.jpg")
    );
    assert_eq!(generator.result_by_id("doubao_1_missing").await, None);
    assert_eq!(generator.result_by_id("doubao_1_broken").await, None);
}

#[tokio::test]
async fn test_result_lookup_keeps_id_in_one_segment() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/history", API_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let generator = generator_for(&server);
    assert_eq!(generator.result_by_id("../history").await, None);
    assert_eq!(generator.result_by_id("doubao_1?limit=1#top").await, None);

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let prefix = format!("{}/result/", API_PATH);
    for request in &requests {
        assert!(request.url.path().starts_with(&prefix), "{}", request.url);
        assert_eq!(request.url.query(), None);
    }
}

#[tokio::test]
async fn test_status_probe() {
    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({ "prompt": "test prompt", "size": "1K", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&healthy)
        .await;

    let status = generator_for(&healthy).check_status().await;
    assert!(status.is_ok());
    assert_eq!(status.status, StatusKind::Ok);
    assert_eq!(status.provider, "doubao");

    let unhealthy = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "The API key is invalid" } })),
        )
        .mount(&unhealthy)
        .await;

    let status = generator_for(&unhealthy).check_status().await;
    assert_eq!(status.status, StatusKind::Error);
    assert_eq!(status.message, "The API key is invalid");

    let bare = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&bare)
        .await;
    assert_eq!(generator_for(&bare).check_status().await.message, "HTTP 503");
}

#[tokio::test]
async fn test_status_probe_transport_failure() {
    let config = GeneratorConfig::new()
        .with_api_key(API_KEY)
        .with_endpoint("http://127.0.0.1:1/api/v3/images/generations")
        .with_timeout(Duration::from_secs(2));

    let status = ImageGenerator::new(&config).unwrap().check_status().await;
    assert!(!status.is_ok());
    assert_eq!(status.status, StatusKind::Error);
    assert_eq!(status.provider, "doubao");
    assert!(!status.message.is_empty());
}
