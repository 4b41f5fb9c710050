//! Gemini provider tests against a local HTTP server
//!
//! Each test starts a one-shot server on a random local port that captures
//! the request and answers with a canned status and body.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use concierge_core::{
    GeminiProvider, ProviderConfig, ProviderError, ProviderRequest, ResponseProvider, Turn,
};

// =============================================================================
// Fake Server
// =============================================================================

struct CapturedRequest {
    /// Request line and headers
    head: String,
    body: String,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Serve exactly one request; returns the base URL and the captured request
async fn serve_once(
    status: u16,
    body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let total = header_end + content_length(&head);
        while buf.len() < total {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request_body = String::from_utf8_lossy(&buf[header_end..total.min(buf.len())]).to_string();

        let response = format!(
            "HTTP/1.1 {status} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        let _ = tx.send(CapturedRequest {
            head,
            body: request_body,
        });
    });

    (format!("http://{addr}/v1beta"), rx)
}

fn provider(base_url: String) -> GeminiProvider {
    GeminiProvider::new(ProviderConfig {
        api_key: Some("secret".to_string()),
        model: "gemini-test".to_string(),
        base_url,
        ..Default::default()
    })
}

const REPLY_BODY: &str =
    r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hi from the twin"}]}}]}"#;

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_successful_reply() {
    let (base_url, captured) = serve_once(200, REPLY_BODY).await;
    let history = vec![Turn::assistant("Hey there!"), Turn::user("hi")];
    let request = ProviderRequest::new("PERSONA", "what do you build?").with_history(&history);

    let reply = provider(base_url).generate(&request).await;
    assert_eq!(reply, Ok("Hi from the twin".to_string()));

    let captured = captured.await.unwrap();
    assert!(
        captured
            .head
            .starts_with("POST /v1beta/models/gemini-test:generateContent?key=secret "),
        "unexpected request line: {}",
        captured.head.lines().next().unwrap_or_default()
    );
    assert!(captured
        .head
        .to_lowercase()
        .contains("content-type: application/json"));

    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(
        body,
        json!({
            "system_instruction": { "parts": [{ "text": "PERSONA" }] },
            "contents": [
                { "role": "user",  "parts": [{ "text": "PERSONA" }] },
                { "role": "model", "parts": [{ "text": "Hey there!" }] },
                { "role": "user",  "parts": [{ "text": "hi" }] },
                { "role": "user",  "parts": [{ "text": "what do you build?" }] }
            ]
        })
    );
}

// =============================================================================
// Failure Normalization
// =============================================================================

#[tokio::test]
async fn test_non_success_status() {
    let (base_url, _captured) =
        serve_once(503, r#"{"error":{"message":"overloaded"}}"#).await;

    let result = provider(base_url)
        .generate(&ProviderRequest::new("p", "hello"))
        .await;

    match result {
        Err(ProviderError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body() {
    let (base_url, _captured) = serve_once(200, "<html>gateway</html>").await;

    let result = provider(base_url)
        .generate(&ProviderRequest::new("p", "hello"))
        .await;

    assert!(matches!(result, Err(ProviderError::Malformed(_))));
}

#[tokio::test]
async fn test_empty_candidates() {
    let (base_url, _captured) = serve_once(200, r#"{"candidates":[]}"#).await;

    let result = provider(base_url)
        .generate(&ProviderRequest::new("p", "hello"))
        .await;

    assert_eq!(result, Err(ProviderError::NoCandidate));
}

#[tokio::test]
async fn test_candidate_without_text() {
    let (base_url, _captured) =
        serve_once(200, r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).await;

    let result = provider(base_url)
        .generate(&ProviderRequest::new("p", "hello"))
        .await;

    assert_eq!(result, Err(ProviderError::NoCandidate));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = provider(format!("http://{addr}/v1beta"))
        .generate(&ProviderRequest::new("p", "hello"))
        .await;

    assert!(matches!(result, Err(ProviderError::Transport(_))));
}
