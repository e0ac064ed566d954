#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use sse_relay_client::{RelayConfig, StreamEvent, StreamFormController};
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STEP_TIMEOUT: Duration = Duration::from_secs(3);

/// Route library logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a `text/event-stream` body frame by frame.
#[derive(Debug, Default)]
pub struct SseBody {
    body: String,
    timestamp: f64,
}

impl SseBody {
    pub fn new() -> Self {
        Self {
            body: String::new(),
            timestamp: 1_718_000_000.0,
        }
    }

    /// Append one frame whose payload is wrapped in the relay envelope.
    pub fn event(mut self, name: &str, data: Value) -> Self {
        self.timestamp += 0.5;
        let envelope = json!({"timestamp": self.timestamp, "data": data});
        self.body
            .push_str(&format!("event: {name}\ndata: {envelope}\n\n"));
        self
    }

    /// Append a frame with a raw `data:` line and no envelope.
    pub fn raw(mut self, name: &str, data: &str) -> Self {
        self.body.push_str(&format!("event: {name}\ndata: {data}\n\n"));
        self
    }

    pub fn keepalive(self) -> Self {
        self.event("keepalive", json!({"status": "alive"}))
    }

    /// The burst the relay emits for one accepted message.
    pub fn burst(mut self, message: &str, total: u64) -> Self {
        for sequence in 1..=total {
            self = self.event(
                "message",
                json!({"message": message, "sequence": sequence, "total": total}),
            );
        }
        self.event("close", json!({"message": message}))
    }

    pub fn build(self) -> String {
        self.body
    }
}

/// A wiremock server speaking the relay's HTTP surface.
pub struct MockRelay {
    server: MockServer,
}

impl MockRelay {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> RelayConfig {
        let mut config = RelayConfig::new(self.url());
        config.timeouts.connect_timeout_secs = 1;
        config.timeouts.request_timeout_secs = 2;
        config
    }

    pub fn controller(&self) -> StreamFormController {
        StreamFormController::from_config(&self.config()).expect("controller config is valid")
    }

    pub async fn accept_messages(&self) {
        Mock::given(method("POST"))
            .and(path("/api/messages"))
            .respond_with(|request: &wiremock::Request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
                ResponseTemplate::new(201).set_body_json(json!({
                    "status": "accepted",
                    "data": {"message": body["message"]},
                }))
            })
            .mount(&self.server)
            .await;
    }

    pub async fn reject_messages(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/messages"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn accept_publish(&self) {
        Mock::given(method("POST"))
            .and(path("/publish"))
            .respond_with(|request: &wiremock::Request| {
                let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
                ResponseTemplate::new(202).set_body_json(json!({
                    "status": "queued",
                    "data": {"message": body["message"]},
                }))
            })
            .mount(&self.server)
            .await;
    }

    pub async fn serve_ping(&self) {
        Mock::given(method("GET"))
            .and(path("/api/ping"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "message": "pong"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve `body` on every `GET /stream`; the connection ends after it.
    pub async fn serve_stream(&self, body: SseBody) {
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.build(), "text/event-stream"))
            .mount(&self.server)
            .await;
    }

    /// Serve a 200 on `GET /stream` with a content type other than SSE.
    pub async fn serve_stream_as(&self, body: &str, mime: &str) {
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
            .mount(&self.server)
            .await;
    }

    pub async fn fail_stream(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }

    pub async fn total_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// Pump the controller until a close or error event has been applied.
pub async fn pump_until_terminal(controller: &mut StreamFormController) -> Vec<StreamEvent> {
    let mut seen = Vec::new();
    loop {
        let event = timeout(STEP_TIMEOUT, controller.pump())
            .await
            .expect("timed out waiting for stream event")
            .expect("update channel closed");
        let terminal = event.is_terminal();
        seen.push(event);
        if terminal {
            return seen;
        }
    }
}
