//! # Relay HTTP Client
//!
//! Low-level transport for the relay service: JSON submissions over
//! `POST`, the heartbeat, and opening SSE connections.
//!
//! One [`reqwest::Client`] is shared by every call, including the stream
//! reader tasks, so connection pooling and TLS setup happen once.
//!
//! The overall request timeout (when configured) is applied per request and
//! never to the stream, which is expected to stay silent for long periods.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::protocol::messages::{ErrorBody, MessageAccepted, PingResponse, SubmitRequest};
use crate::streams::{StreamConnection, UpdateSender};

/// HTTP client for the relay endpoints.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    request_timeout: Option<Duration>,
}

/// Fully-qualified endpoint URLs, resolved once from the config.
#[derive(Debug)]
struct Endpoints {
    base: String,
    messages: String,
    stream: String,
    ping: String,
    publish: String,
}

impl RelayClient {
    /// Build a client for the configured relay.
    ///
    /// No network traffic happens here.
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        config.validate()?;

        let builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_timeout_secs));

        #[cfg(any(feature = "rustls-tls", feature = "native-tls"))]
        let builder = builder.danger_accept_invalid_certs(config.allow_insecure_tls);

        #[cfg(not(any(feature = "rustls-tls", feature = "native-tls")))]
        if config.is_tls() {
            return Err(RelayError::ConnectionFailed {
                url: config.base_url.clone(),
                reason: "built without a TLS feature (enable `rustls-tls` or `native-tls`)".into(),
            });
        }

        let http = builder.build().map_err(|e| RelayError::ConnectionFailed {
            url: config.base_url.clone(),
            reason: format!("HTTP client configuration failed: {e}"),
        })?;

        let request_timeout = match config.timeouts.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        tracing::debug!(base_url = %config.base_url, "Relay client ready");

        Ok(Self {
            http,
            endpoints: Arc::new(Endpoints {
                base: config.base_url.clone(),
                messages: config.endpoint(&config.messages_path),
                stream: config.endpoint(&config.stream_path),
                ping: config.endpoint(&config.ping_path),
                publish: config.endpoint(&config.publish_path),
            }),
            request_timeout,
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.endpoints.base
    }

    /// Full URL of the SSE endpoint.
    pub fn stream_url(&self) -> &str {
        &self.endpoints.stream
    }

    fn with_timeout(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    // ─── REST ───────────────────────────────────────────────────────────

    /// Submit a message; the relay broadcasts it to stream listeners.
    ///
    /// # Errors
    /// [`RelayError::Request`] on network failure, a non-2xx status (carrying
    /// the server's `error` text, or "Request failed"), or a success body
    /// without `data.message`.
    pub async fn post_message(&self, message: &str) -> RelayResult<MessageAccepted> {
        self.submit(&self.endpoints.messages, message).await
    }

    /// Push a message straight into the stream queue via `/publish`.
    ///
    /// # Errors
    /// Same as [`post_message`](Self::post_message).
    pub async fn publish(&self, message: &str) -> RelayResult<MessageAccepted> {
        self.submit(&self.endpoints.publish, message).await
    }

    async fn submit(&self, url: &str, message: &str) -> RelayResult<MessageAccepted> {
        tracing::debug!(url, "Posting message");

        let response = self
            .with_timeout(self.http.post(url).json(&SubmitRequest::new(message)))
            .send()
            .await
            .inspect_err(|e| tracing::error!(url, "Relay request failed: {}", e))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = RelayError::rejected(status.as_u16(), ErrorBody::extract(&body));
            tracing::error!(url, status = status.as_u16(), error = %err, "Relay rejected message");
            return Err(err);
        }

        let accepted: MessageAccepted =
            serde_json::from_str(&body).map_err(|e| RelayError::Request {
                status: Some(status.as_u16()),
                message: format!("Malformed response from relay: {e}"),
            })?;

        tracing::debug!(url, status = status.as_u16(), "Relay accepted message");
        Ok(accepted)
    }

    /// Call the heartbeat endpoint.
    ///
    /// # Errors
    /// [`RelayError::Request`] on network failure or a non-2xx status,
    /// [`RelayError::Protocol`] if the body is not a ping response.
    pub async fn ping(&self) -> RelayResult<PingResponse> {
        let url = &self.endpoints.ping;
        let response = self.with_timeout(self.http.get(url)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::rejected(status.as_u16(), ErrorBody::extract(&body)));
        }

        serde_json::from_str(&body).map_err(|e| RelayError::Protocol {
            reason: format!("Unexpected ping response: {e}"),
        })
    }

    // ─── Streaming ──────────────────────────────────────────────────────

    /// Open a new SSE connection whose updates are tagged with
    /// `connection_id` and delivered on `updates`.
    ///
    /// Returns immediately; `Open` (or `Error`) arrives on the channel once
    /// the server answers. Must be called inside a tokio runtime.
    pub fn open_stream(&self, connection_id: u64, updates: UpdateSender) -> StreamConnection {
        tracing::debug!(connection_id, url = %self.endpoints.stream, "Opening stream");
        StreamConnection::spawn(
            self.http.clone(),
            self.endpoints.stream.clone(),
            connection_id,
            updates,
        )
    }
}
