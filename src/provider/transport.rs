//! Single-shot HTTP transport for chat-completions requests.
//!
//! One request, one response: no retries and no backoff. Callers decide
//! what to do with a failure.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::error::ApiError;
use crate::config::ApiKey;
use crate::constants::{CHAT_COMPLETIONS_PATH, CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};

/// Sends a fully built request body and returns the parsed reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_request(&self, body: &Value) -> Result<Value, ApiError>;
}

/// [`Transport`] over HTTPS using `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: ApiKey,
}

impl HttpTransport {
    /// Creates a transport posting to `<base_url>/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: ApiKey) -> Result<Self> {
        Self::with_builder(reqwest::Client::builder(), base_url, api_key)
    }

    fn with_builder(
        builder: reqwest::ClientBuilder,
        base_url: &str,
        api_key: ApiKey,
    ) -> Result<Self> {
        let client = builder
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH),
            api_key,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_request(&self, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose())
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status, bytes = text.len(), "received response");

        interpret_response(status, &text)
    }
}

/// Classifies a raw HTTP reply.
///
/// Non-200 statuses become [`ApiError::Status`] carrying `error.message`
/// from a JSON body when present, otherwise the raw body text. A 200 body
/// that is not JSON is a [`ApiError::MalformedResponse`].
pub fn interpret_response(status: u16, body: &str) -> Result<Value, ApiError> {
    if status != 200 {
        let message = extract_error_message(body).unwrap_or_else(|| body.to_string());
        return Err(ApiError::Status { status, message });
    }
    serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("Failed to parse response JSON: {e}")))
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")?
        .get("message")?
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Talks to `base_url` directly, ignoring any proxy in the environment.
    fn local_transport(base_url: &str, key: &str) -> HttpTransport {
        let builder = reqwest::Client::builder().no_proxy();
        HttpTransport::with_builder(builder, base_url, ApiKey::new(key)).unwrap()
    }

    /// Accepts one connection, answers it with `status` and `body`, and
    /// returns the request head (request line and headers).
    async fn serve_once(listener: TcpListener, status: &'static str, body: String) -> String {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        let text = String::from_utf8_lossy(&request).into_owned();
        text.split("\r\n\r\n").next().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = local_transport("http://127.0.0.1:1", "k");
        let err = transport.post_request(&json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
        assert!(err.to_string().starts_with("HTTP request failed:"));
    }

    #[tokio::test]
    async fn test_request_headers_and_status_classification() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = json!({"error": {"message": "Invalid API key"}}).to_string();
        let server = tokio::spawn(serve_once(listener, "401 Unauthorized", body));

        let transport = local_transport(&format!("http://{addr}/api/v1"), "sk-test-key");
        let err = transport
            .post_request(&json!({"model": "m", "messages": []}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (401): Invalid API key");

        let head = server.await.unwrap();
        let lines: Vec<String> = head.lines().map(|l| l.to_ascii_lowercase()).collect();
        assert!(lines[0].starts_with("post /api/v1/chat/completions "), "{head}");
        assert!(lines.iter().any(|l| l == "authorization: bearer sk-test-key"), "{head}");
        assert!(lines.iter().any(|l| l == "content-type: application/json"), "{head}");
    }

    #[tokio::test]
    async fn test_ok_reply_is_parsed_end_to_end() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hi"}}]});
        let server = tokio::spawn(serve_once(listener, "200 OK", body.to_string()));

        let transport = local_transport(&format!("http://{addr}"), "k");
        let reply = transport.post_request(&json!({})).await.unwrap();
        assert_eq!(reply, body);
        server.await.unwrap();
    }

    #[test]
    fn test_ok_body_parses() {
        let value = interpret_response(200, r#"{"choices": []}"#).unwrap();
        assert!(value["choices"].is_array());
    }

    #[test]
    fn test_ok_body_not_json() {
        let err = interpret_response(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
        assert!(err.to_string().starts_with("Failed to parse response JSON"));
    }

    #[test]
    fn test_structured_error_message() {
        let err = interpret_response(
            429,
            r#"{"error": {"message": "API rate limit exceeded", "code": 429}}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "API error (429): API rate limit exceeded");
    }

    #[test]
    fn test_unstructured_error_falls_back_to_body() {
        let err = interpret_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }

    #[test]
    fn test_json_error_without_message_falls_back_to_body() {
        let body = r#"{"error": "nope"}"#;
        let err = interpret_response(401, body).unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let transport =
            HttpTransport::new("https://example.test/api/v1/", ApiKey::new("k")).unwrap();
        assert_eq!(transport.url, "https://example.test/api/v1/chat/completions");
    }
}
