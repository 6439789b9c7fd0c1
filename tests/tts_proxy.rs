//! Integration tests for the speech-synthesis proxy
//!
//! The ElevenLabs API is simulated with wiremock; the router is exercised
//! directly with tower's oneshot.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use durmah_gateway::{AppState, ServerConfig, routes};

fn test_config(elevenlabs_api_base: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.elevenlabs_api_key = Some("el-test".to_string());
    config.elevenlabs_voice_id = Some("voice-1".to_string());
    config.elevenlabs_api_base = elevenlabs_api_base.to_string();
    config
}

fn app(config: ServerConfig) -> Router {
    routes::create_app(AppState::new(config))
}

async fn post_tts(app: Router, body: Value) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tts")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

#[tokio::test]
async fn empty_text_returns_400_without_provider_call() {
    let mock_server = MockServer::start().await;

    let (status, _, body) = post_tts(app(test_config(&mock_server.uri())), json!({"text": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "Text cannot be empty");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn whitespace_text_and_missing_field_are_rejected() {
    let mock_server = MockServer::start().await;

    let (status, _, _) = post_tts(
        app(test_config(&mock_server.uri())),
        json!({"text": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = post_tts(app(test_config(&mock_server.uri())), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_body_and_malformed_json_return_400() {
    let mock_server = MockServer::start().await;

    // No body at all
    let response = app(test_config(&mock_server.uri()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unparseable body
    let response = app(test_config(&mock_server.uri()))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tts")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_configuration_returns_500() {
    let mock_server = MockServer::start().await;

    // No API key at all
    let mut config = test_config(&mock_server.uri());
    config.elevenlabs_api_key = None;
    let (status, _, body) = post_tts(app(config), json!({"text": "hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "ElevenLabs API key not configured in server environment"
    );

    // Key present but no voice id
    let mut config = test_config(&mock_server.uri());
    config.elevenlabs_voice_id = None;
    let (status, _, body) = post_tts(app(config), json!({"text": "hello"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body["error"],
        "ElevenLabs voice ID not configured in server environment"
    );

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn success_returns_base64_mpeg_with_no_caching() {
    let audio_bytes: &[u8] = b"\xff\xf3\x44\xc4fake-mpeg-frames";

    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .and(header("xi-api-key", "el-test"))
        .and(query_param("optimize_streaming_latency", "3"))
        .and(query_param("output_format", "mp3_44100_64"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(audio_bytes),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, headers, body) = post_tts(
        app(test_config(&mock_server.uri())),
        json!({"text": "Hello from Durmah"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("content-type").unwrap(), "audio/mpeg");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");

    // Body is the provider audio, base64-transported
    assert!(!body.is_empty());
    let decoded = BASE64.decode(&body).unwrap();
    assert_eq!(decoded, audio_bytes);
}

#[tokio::test]
async fn provider_error_is_forwarded_verbatim() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/text-to-speech/voice-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let (status, _, body) = post_tts(
        app(test_config(&mock_server.uri())),
        json!({"text": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, b"invalid api key");
}

#[tokio::test]
async fn non_post_method_is_rejected() {
    let mock_server = MockServer::start().await;

    let response = app(test_config(&mock_server.uri()))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/tts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn options_preflight_succeeds_with_cors_headers() {
    let mock_server = MockServer::start().await;
    let mut config = test_config(&mock_server.uri());
    config.cors_allowed_origins = Some("https://widget.example".to_string());

    let response = app(config)
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/tts")
                .header("origin", "https://widget.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "https://widget.example"
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
