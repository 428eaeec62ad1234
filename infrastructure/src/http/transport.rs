//! reqwest-backed chat transport.

use super::body::decode_body;
use super::protocol::{ChatRequest, error_message, parse_sync_response};
use async_trait::async_trait;
use chatline_application::{AuthProvider, ChatStream, ChatTransport, TransportError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Endpoint and mode settings for [`HttpChatTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    pub base_url: String,
    /// Path of the streaming endpoint.
    pub chat_path: String,
    /// Path of the buffered endpoint.
    pub sync_path: String,
    /// Response header carrying the resolved thread id.
    pub thread_header: String,
    /// Use the streaming endpoint. When false the whole reply is fetched
    /// from the buffered endpoint and exposed as a single delta.
    pub streaming: bool,
    /// Limit on waiting for the response headers (and, in buffered mode,
    /// the whole body).
    pub timeout: Option<Duration>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            chat_path: "/chat".to_string(),
            sync_path: "/chat/sync".to_string(),
            thread_header: "X-Thread-Id".to_string(),
            streaming: true,
            timeout: None,
        }
    }
}

/// Chat transport that POSTs to the backend with a bearer token.
///
/// Each `send` issues exactly one request; there is no retry.
pub struct HttpChatTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
    auth: Arc<dyn AuthProvider>,
}

impl HttpChatTransport {
    pub fn new(config: HttpTransportConfig, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            auth,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Authenticate and POST, failing on any non-success status.
    async fn post(
        &self,
        path: &str,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<reqwest::Response, TransportError> {
        let token = self.auth.token().await?;
        let url = self.endpoint(path);
        debug!("POST {} (thread: {})", url, thread_id.unwrap_or("new"));

        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&ChatRequest { message, thread_id })
            .send();

        let response = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, request).await.map_err(|_| {
                TransportError::Connection(format!("request timed out after {}s", limit.as_secs()))
            })?,
            None => request.await,
        }
        .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(&body);
            warn!("Chat request rejected with {}: {}", status, message);
            return Err(TransportError::Rejected(message));
        }

        Ok(response)
    }

    /// Thread id from the response header, else the request's, else empty.
    fn resolve_thread_id(&self, response: &reqwest::Response, input: Option<&str>) -> String {
        response
            .headers()
            .get(self.config.thread_header.as_str())
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .or(input)
            .unwrap_or_default()
            .to_string()
    }

    async fn send_streaming(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatStream, TransportError> {
        let response = self.post(&self.config.chat_path, message, thread_id).await?;
        let resolved = self.resolve_thread_id(&response, thread_id);
        info!("Streaming reply (thread: {})", resolved);
        Ok(ChatStream::new(resolved, decode_body(response.bytes_stream())))
    }

    async fn send_buffered(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatStream, TransportError> {
        let response = self.post(&self.config.sync_path, message, thread_id).await?;

        let read = response.bytes();
        let body = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
                TransportError::Connection(format!("request timed out after {}s", limit.as_secs()))
            })?,
            None => read.await,
        }
        .map_err(|e| TransportError::Connection(e.to_string()))?;

        let (reply, resolved) = parse_sync_response(&body)?;
        info!("Buffered reply of {} bytes (thread: {})", reply.len(), resolved);
        Ok(ChatStream::from_deltas(resolved, vec![Ok(reply)]))
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(
        &self,
        message: &str,
        thread_id: Option<&str>,
    ) -> Result<ChatStream, TransportError> {
        if self.config.streaming {
            self.send_streaming(message, thread_id).await
        } else {
            self.send_buffered(message, thread_id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoAuth;

    #[async_trait]
    impl AuthProvider for NoAuth {
        async fn token(&self) -> Result<String, chatline_application::AuthError> {
            Err(chatline_application::AuthError::NotSignedIn)
        }
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = HttpTransportConfig {
            base_url: "http://example.test/api/".to_string(),
            ..Default::default()
        };
        let transport = HttpChatTransport::new(config, Arc::new(NoAuth));
        assert_eq!(transport.endpoint("/chat"), "http://example.test/api/chat");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        // Nothing listens on this port; reaching the network would be a
        // connection error instead.
        let config = HttpTransportConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let transport = HttpChatTransport::new(config, Arc::new(NoAuth));
        let err = transport.send("Hello", None).await.unwrap_err();
        assert_eq!(err, TransportError::AuthRequired);
    }
}
