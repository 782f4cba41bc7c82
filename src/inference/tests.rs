//! Tests for the inference module
//!
//! The HTTP client is exercised against a one-shot local server that
//! captures the raw request and replies with a canned response.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;
use crate::core::config::InferenceClientConfig;

/// Serve exactly one HTTP response and capture the raw request
async fn serve_once(
    status_line: &'static str,
    extra_headers: &'static str,
    body: String,
) -> (String, Arc<Mutex<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(String::new()));
    let captured_clone = Arc::clone(&captured);

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        *captured_clone.lock() = String::from_utf8_lossy(&buf).to_string();

        let response = format!(
            "{}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            extra_headers,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (format!("http://{}/v1", addr), captured)
}

fn rewrite_request() -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: "test/llama".to_string(),
        messages: vec![ChatMessage::user("Improve: test query")],
        max_tokens: Some(100),
        temperature: Some(0.3),
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[test]
fn test_request_serialization() {
    let json = serde_json::to_value(rewrite_request()).unwrap();
    assert_eq!(json["model"], "test/llama");
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"], "Improve: test query");
    assert_eq!(json["max_tokens"], 100);
}

#[test]
fn test_response_first_content() {
    let response: ChatCompletionResponse = serde_json::from_str(
        r#"{"choices": [{"message": {"role": "assistant", "content": "expanded query"}}]}"#,
    )
    .unwrap();
    assert_eq!(response.first_content(), Some("expanded query"));
    assert!(response.usage.is_none());

    let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert_eq!(empty.first_content(), None);
}

// ============================================================================
// HTTP client
// ============================================================================

#[tokio::test]
async fn test_chat_completion_success() {
    let body = r#"{"id": "c1", "choices": [{"index": 0, "message": {"role": "assistant", "content": "machine learning artificial intelligence"}}], "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}}"#;
    let (base_url, captured) = serve_once("HTTP/1.1 200 OK", "", body.to_string()).await;

    let client =
        OpenAiCompatClient::new(InferenceClientConfig::new(base_url).with_api_key("sk-test"))
            .unwrap();
    let response = client.openai_chat_completion(rewrite_request()).await.unwrap();

    assert_eq!(
        response.first_content(),
        Some("machine learning artificial intelligence")
    );
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(15));

    let raw = captured.lock().clone();
    assert!(raw.starts_with("POST /v1/chat/completions"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
    assert!(raw.contains("\"model\":\"test/llama\""));
}

#[tokio::test]
async fn test_chat_completion_rate_limited() {
    let (base_url, _) = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        "Retry-After: 7\r\n",
        "{}".to_string(),
    )
    .await;

    let client = OpenAiCompatClient::new(InferenceClientConfig::new(base_url)).unwrap();
    let err = client.openai_chat_completion(rewrite_request()).await.unwrap_err();

    assert!(matches!(
        err,
        InferenceError::RateLimitExceeded { retry_after_secs: 7 }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_chat_completion_api_error() {
    let (base_url, _) = serve_once(
        "HTTP/1.1 400 Bad Request",
        "",
        r#"{"error": "model not found"}"#.to_string(),
    )
    .await;

    let client = OpenAiCompatClient::new(InferenceClientConfig::new(base_url)).unwrap();
    let err = client.openai_chat_completion(rewrite_request()).await.unwrap_err();

    match err {
        InferenceError::ApiError { status, reason } => {
            assert_eq!(status, 400);
            assert!(reason.contains("model not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_completion_connection_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        OpenAiCompatClient::new(InferenceClientConfig::new(format!("http://{}/v1", addr)))
            .unwrap();
    let err = client.openai_chat_completion(rewrite_request()).await.unwrap_err();
    assert!(matches!(err, InferenceError::NetworkError { .. }));
}

#[tokio::test]
async fn test_endpoint_trims_trailing_slash() {
    let client =
        OpenAiCompatClient::new(InferenceClientConfig::new("http://localhost:8321/v1/")).unwrap();
    assert_eq!(client.endpoint(), "http://localhost:8321/v1/chat/completions");
}
