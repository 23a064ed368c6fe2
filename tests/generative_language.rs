use rimagen::{
    ApiKeyTransport, GenerativeLanguageClient, GenerativeLanguageConfig, ImageRequestHandler,
    ResponseShape,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/imagen-4.0-generate-001:generateImages";

fn handler_for(server: &MockServer, transport: ApiKeyTransport) -> ImageRequestHandler {
    let config = GenerativeLanguageConfig::new()
        .with_api_key("test-key")
        .with_api_base(format!("{}/v1beta", server.uri()))
        .with_api_key_transport(transport);
    let client = GenerativeLanguageClient::new(config, reqwest::Client::new())
        .expect("valid config");
    ImageRequestHandler::new(Arc::new(client), ResponseShape::Images)
}

#[tokio::test]
async fn test_red_fox_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "a red fox" }] }],
            "generationConfig": { "numberOfImages": 1, "aspectRatio": "16:9" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generatedImages": [{ "image": { "imageBytes": "iVBORw0KGgo=" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Query);
    let response = handler.handle("POST", br#"{"prompt":"a red fox"}"#).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "images": ["iVBORw0KGgo="] }));
}

#[tokio::test]
async fn test_header_transport_and_missing_entries_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generatedImages": [
                { "image": { "imageBytes": "AAA" } },
                { "image": {} }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Header);
    let response = handler.handle("POST", br#"{"prompt":"a lighthouse"}"#).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "images": ["AAA"] }));
}

#[tokio::test]
async fn test_unparsable_upstream_error_keeps_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>upstream down</html>"))
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Query);
    let response = handler.handle("POST", br#"{"prompt":"a red fox"}"#).await;

    assert_eq!(response.status, 500);
    assert_eq!(
        response.body,
        json!({ "error": "Imagen error", "details": { "raw": "<html>upstream down</html>" } })
    );
}

#[tokio::test]
async fn test_upstream_json_error_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Query);
    let response = handler.handle("POST", br#"{"prompt":"a red fox"}"#).await;

    assert_eq!(response.status, 400);
    assert_eq!(response.body["details"]["error"]["message"], "API key not valid");
}

#[tokio::test]
async fn test_malformed_success_body_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Query);
    let response = handler.handle("POST", br#"{"prompt":"a red fox"}"#).await;

    assert_eq!(response.status, 500);
    assert_eq!(response.body["details"], "not json");
}

#[tokio::test]
async fn test_non_post_never_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = handler_for(&server, ApiKeyTransport::Query);
    let response = handler.handle("GET", br#"{"prompt":"a red fox"}"#).await;
    assert_eq!(response.status, 405);

    let response = handler.handle("POST", br#"{"prompt":""}"#).await;
    assert_eq!(response.status, 400);
}
