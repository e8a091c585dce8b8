//! ModelClient tests against a mock gateway.

use std::net::TcpListener;
use std::time::Duration;

use llama_gateway_client::client::{ClientConfig, EndpointConfig, ModelClient, GENERATE_PATH};
use llama_gateway_client::telemetry::TracingContext;
use llama_gateway_client::{FailureKind, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ModelClient {
    let addr = server.address();
    let endpoint = EndpointConfig::with_port(addr.ip().to_string(), addr.port());
    ModelClient::new(ClientConfig::new(endpoint)).unwrap()
}

/// Port with nothing listening on it.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// =============================================================================
// Request shape
// =============================================================================

#[tokio::test]
async fn sends_exact_default_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "text_input": "hello",
            "max_tokens": 250,
            "bad_words": "",
            "stop_words": "",
            "pad_id": 2,
            "end_id": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text_output": "hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client.generate_default("hello").await.unwrap();
    assert_eq!(output, "hi");
}

#[tokio::test]
async fn sends_gateway_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("host", "llama.default.example.com"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text_output": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate("ping", 8).await.unwrap(), "ok");
}

#[tokio::test]
async fn passes_custom_max_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "text_input": "tell me more",
            "max_tokens": 32,
            "bad_words": "",
            "stop_words": "",
            "pad_id": 2,
            "end_id": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text_output": "more"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate("tell me more", 32).await.unwrap(), "more");
}

// =============================================================================
// Response handling
// =============================================================================

#[tokio::test]
async fn trims_generated_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"text_output": "  hi there  "})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate_default("hello").await.unwrap(), "hi there");
}

#[tokio::test]
async fn missing_text_output_is_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate_default("hello").await.unwrap(), "");
}

#[tokio::test]
async fn ignores_other_response_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model_name": "ensemble",
            "model_version": "1",
            "sequence_id": 0,
            "text_output": "answer\n"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.generate_default("question").await.unwrap(), "answer");
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn server_error_is_status_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("An error occurred: "), "{message}");
    assert!(message.contains("500 Internal Server Error"), "{message}");
    assert_eq!(err.kind(), FailureKind::Status);
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
}

#[tokio::test]
async fn client_error_is_not_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("404 Not Found"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn connection_refused_is_network_failure() {
    let endpoint = EndpointConfig::with_port("127.0.0.1", closed_port());
    let client = ModelClient::new(ClientConfig::new(endpoint)).unwrap();

    let err = client.generate_default("hello").await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("An error occurred: "), "{message}");
    assert!(message.to_lowercase().contains("connection refused"), "{message}");
    assert_eq!(err.kind(), FailureKind::Network);
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn invalid_json_is_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();
    assert!(err.to_string().starts_with("An error occurred: "));
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn null_text_output_is_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text_output": null})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn array_body_is_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["  leaked  "])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();
    assert!(err.to_string().starts_with("An error occurred: "));
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn empty_array_body_is_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.generate_default("hello").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"text_output": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let addr = server.address();
    let endpoint = EndpointConfig::with_port(addr.ip().to_string(), addr.port());
    let config = ClientConfig::new(endpoint).with_timeout(Duration::from_millis(200));
    let client = ModelClient::new(config).unwrap();

    let err = client.generate_default("hello").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Timeout);
    assert!(err.to_string().starts_with("An error occurred: "));
}

#[tokio::test]
async fn failure_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.generate_default("hello").await.is_err());
    server.verify().await;
}

// =============================================================================
// Tracing context and trait seam
// =============================================================================

#[tokio::test]
async fn generate_in_explicit_context() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text_output": "traced"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .generate_in(&TracingContext::none(), "hello", 16)
        .await
        .unwrap();
    assert_eq!(output, "traced");

    let ctx = TracingContext::new(tracing::info_span!("chat_turn"));
    assert_eq!(client.generate_in(&ctx, "hello", 16).await.unwrap(), "traced");
}

#[tokio::test]
async fn text_generator_impl_delegates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"text_output": " via trait "})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let generator: &dyn TextGenerator = &client;
    assert_eq!(generator.generate("hello", 250).await.unwrap(), "via trait");
}
