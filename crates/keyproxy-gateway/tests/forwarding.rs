//! End-to-end forwarding tests against a mocked Gemini endpoint.
//!
//! Tests cover:
//! 1. Outbound request shape (method, path, key query param, content type, body)
//! 2. Success, upstream error, and transport failure mapping
//! 3. No state carried between requests or routes

use bytes::Bytes;
use keyproxy_config::{ProxyConfig, UpstreamConfig};
use keyproxy_gateway::{Gateway, GatewayRequest, Route};
use secrecy::SecretString;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{any, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash-latest:generateContent";

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn config_for(base_url: &str, api_key: Option<&str>) -> ProxyConfig {
    ProxyConfig {
        api_key: api_key.map(SecretString::from),
        upstream: UpstreamConfig {
            base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        },
        ..ProxyConfig::default()
    }
}

fn gateway_for(server: &MockServer, api_key: Option<&str>) -> Gateway {
    Gateway::from_config(&config_for(&server.uri(), api_key)).unwrap()
}

fn json_of(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap()
}

/// An address nothing listens on.
async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_key_skips_upstream_on_both_routes() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, None);

    for route in Route::ALL {
        for body in ["", "not json", r#"{"contents":[]}"#] {
            let response = gateway.forward(GatewayRequest::new(route, body)).await;
            assert_eq!(response.status, 500);
            assert_eq!(
                response.body,
                Bytes::from_static(br#"{"error":"API key is not configured on the server."}"#)
            );
        }
    }
}

#[tokio::test]
async fn test_outbound_request_carries_key_and_verbatim_body() {
    let server = MockServer::start().await;
    let inbound = r#"{"contents": [{"role": "user", "parts": [{"text": "Build a landing page"}]}]}"#;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_string(inbound))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let response = gateway
        .forward(GatewayRequest::new(Route::Generate, inbound))
        .await;

    assert_eq!(response.status, 200);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.query(), Some("key=test-key"));
}

#[tokio::test]
async fn test_success_body_is_byte_for_byte() {
    let server = MockServer::start().await;
    let upstream_body =
        "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello!\"}],\"role\":\"model\"}}],\n  \"usageMetadata\": {\"totalTokenCount\": 7}}";

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let response = gateway
        .forward(GatewayRequest::new(Route::Chat, r#"{"contents":[]}"#))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, Bytes::from(upstream_body));
}

#[tokio::test]
async fn test_upstream_rate_limit_is_relayed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_raw(r#"{"error":{"message":"quota exceeded"}}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let response = gateway
        .forward(GatewayRequest::new(Route::Generate, "{}"))
        .await;

    assert_eq!(response.status, 429);
    assert_eq!(
        json_of(&response.body),
        json!({
            "error": "Failed to fetch from Google AI API",
            "details": {"error": {"message": "quota exceeded"}}
        })
    );
}

#[tokio::test]
async fn test_upstream_non_json_error_is_generic_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_raw("<html>Bad Gateway</html>", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let response = gateway
        .forward(GatewayRequest::new(Route::Chat, "{}"))
        .await;

    assert_eq!(response.status, 500);
    assert_eq!(
        response.body,
        Bytes::from_static(br#"{"error":"Internal Server Error"}"#)
    );
}

#[tokio::test]
async fn test_upstream_empty_error_is_generic_500() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let response = gateway
        .forward(GatewayRequest::new(Route::Generate, "{}"))
        .await;

    assert_eq!(response.status, 500);
    assert_eq!(json_of(&response.body), json!({"error": "Internal Server Error"}));
}

#[tokio::test]
async fn test_unreachable_upstream_is_generic_500() {
    let gateway = Gateway::from_config(&config_for(&closed_port_url().await, Some("test-key")))
        .unwrap();

    for route in Route::ALL {
        let response = gateway.forward(GatewayRequest::new(route, "{}")).await;
        assert_eq!(response.status, 500);
        assert_eq!(
            response.body,
            Bytes::from_static(br#"{"error":"Internal Server Error"}"#)
        );
    }
}

#[tokio::test]
async fn test_transport_error_does_not_expose_key() {
    use keyproxy_gateway::{HttpUpstream, UpstreamClient};

    let config = UpstreamConfig {
        base_url: closed_port_url().await,
        ..UpstreamConfig::default()
    };
    let upstream = HttpUpstream::new(&config).unwrap();

    let err = upstream
        .generate_content(&SecretString::from("very-secret-key"), Bytes::from("{}"))
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("very-secret-key"));
    assert!(!format!("{:?}", err).contains("very-secret-key"));
}

#[tokio::test]
async fn test_same_body_twice_yields_identical_responses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"candidates":[]}"#, "application/json"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, Some("test-key"));
    let request = GatewayRequest::new(Route::Generate, r#"{"contents":[{"parts":[{"text":"x"}]}]}"#);

    let first = gateway.forward(request.clone()).await;
    let second = gateway.forward(request).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_routes_do_not_affect_each_other() {
    let failing = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400).set_body_raw(r#"{"error":{"code":400}}"#, "application/json"),
        )
        .mount(&failing)
        .await;

    let gateway = gateway_for(&failing, Some("test-key"));

    let generate = gateway
        .forward(GatewayRequest::new(Route::Generate, "{}"))
        .await;
    let chat = gateway.forward(GatewayRequest::new(Route::Chat, "{}")).await;
    assert_eq!(generate, chat);

    let healthy = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
        .mount(&healthy)
        .await;

    let gateway = gateway_for(&healthy, Some("test-key"));

    let chat = gateway.forward(GatewayRequest::new(Route::Chat, "{}")).await;
    let generate = gateway
        .forward(GatewayRequest::new(Route::Generate, "{}"))
        .await;
    assert_eq!(chat.status, 200);
    assert_eq!(chat, generate);
}
