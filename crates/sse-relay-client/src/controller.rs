//! # Stream Form Controller
//!
//! [`StreamFormController`] owns everything the message form needs: the
//! input text, the event log, the feedback banner, and the single SSE
//! connection slot.
//!
//! ## Lifecycle
//!
//! ```text
//!            submit (non-empty)                Open / Keepalive
//!   Idle ───────────────────────► Pending ───────────────────────► Connected
//!    ▲                               │                                 │
//!    │ Close event                   │ Error event / POST failure      │
//!    └───────────────────────────────┴──────────────► Error ◄──────────┘
//! ```
//!
//! Every submission tears down the current connection (if any) and opens a
//! fresh one before the POST is sent. A failed POST, a `close` event, or a
//! stream error tears the connection down again. There is no automatic
//! retry: reconnecting always takes a new submission.
//!
//! ## Driving the controller
//!
//! The controller is `&mut`-driven by a single event loop. Stream events
//! arrive on an internal channel and are applied by [`pump`]:
//!
//! ```no_run
//! use sse_relay_client::{RelayConfig, StreamFormController};
//!
//! # async fn demo() -> sse_relay_client::RelayResult<()> {
//! let mut controller = StreamFormController::from_config(&RelayConfig::default())?;
//! controller.submit("hello").await?;
//! while let Some(event) = controller.pump().await {
//!     if event.is_terminal() {
//!         break;
//!     }
//! }
//! for entry in controller.log().iter() {
//!     println!("{}", entry.render());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! An event loop that must stay responsive while the POST is in flight can
//! split the submission with [`begin_submit`] and [`complete_submit`] and
//! run the request on a spawned task in between.
//!
//! [`pump`]: StreamFormController::pump
//! [`begin_submit`]: StreamFormController::begin_submit
//! [`complete_submit`]: StreamFormController::complete_submit

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::client::RelayClient;
use crate::config::{RelayConfig, UiConfig};
use crate::error::{RelayError, RelayResult};
use crate::log::{EventLog, LogCategory, LogEntry};
use crate::protocol::events::{
    StreamEnvelope, StreamEvent, StreamUpdate, close_notice, describe_message,
};
use crate::protocol::messages::MessageAccepted;
use crate::streams::{ConnectionProbe, StreamConnection, UpdateReceiver, UpdateSender};

const WELCOME_TEXT: &str = "Submit a message to trigger the SSE stream.";
const IDLE_TEXT: &str = "Stream idle";
const CONNECTING_TEXT: &str = "Connecting to stream...";
const ATTACHED_TEXT: &str = "Stream connected. Waiting for events...";
const CONNECTED_TEXT: &str = "Connected. Waiting for data...";
const KEEPALIVE_TEXT: &str = "Awaiting message burst...";
const COMPLETED_TEXT: &str = "Stream completed.";
const STREAM_ERROR_NOTICE: &str = "Stream error or server closed connection.";
const STREAM_ERROR_TEXT: &str = "Stream closed due to error.";
const REQUEST_FAILED_TEXT: &str = "Stream cancelled because the request failed.";

/// Connection state shown next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    Idle,
    Pending,
    Connected,
    Error,
}

impl StreamState {
    pub fn label(self) -> &'static str {
        match self {
            StreamState::Idle => "idle",
            StreamState::Pending => "pending",
            StreamState::Connected => "connected",
            StreamState::Error => "error",
        }
    }
}

/// Current connection state plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamStatus {
    pub state: StreamState,
    pub text: String,
}

impl StreamStatus {
    fn new(state: StreamState, text: impl Into<String>) -> Self {
        Self {
            state,
            text: text.into(),
        }
    }
}

/// Transient feedback shown after a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub raised_at: Instant,
}

/// Form + SSE controller. See the [module docs](self).
pub struct StreamFormController {
    client: RelayClient,
    input: String,
    log: EventLog,
    status: StreamStatus,
    banner: Option<Banner>,
    banner_ttl: Duration,
    connection: Option<StreamConnection>,
    next_connection_id: u64,
    updates_tx: UpdateSender,
    updates_rx: UpdateReceiver,
}

impl StreamFormController {
    /// Create a controller around an existing client.
    pub fn new(client: RelayClient, ui: &UiConfig) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            client,
            input: String::new(),
            log: EventLog::with_capacity(ui.log_capacity),
            status: StreamStatus::new(StreamState::Idle, IDLE_TEXT),
            banner: None,
            banner_ttl: Duration::from_secs(ui.banner_secs),
            connection: None,
            next_connection_id: 1,
            updates_tx,
            updates_rx,
        };
        controller.append(LogCategory::Status, WELCOME_TEXT);
        controller
    }

    /// Build the client from `config` and wrap it.
    ///
    /// # Errors
    /// Returns any error from [`RelayClient::new`].
    pub fn from_config(config: &RelayConfig) -> RelayResult<Self> {
        Ok(Self::new(RelayClient::new(config)?, &config.ui))
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn client(&self) -> &RelayClient {
        &self.client
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn status(&self) -> &StreamStatus {
        &self.status
    }

    /// Returns `true` while a connection handle is held.
    pub fn has_active_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Observer for the current connection, if any.
    pub fn connection_probe(&self) -> Option<ConnectionProbe> {
        self.connection.as_ref().map(StreamConnection::probe)
    }

    /// The banner, if raised less than the configured delay before `now`.
    pub fn banner_at(&self, now: Instant) -> Option<&Banner> {
        self.banner
            .as_ref()
            .filter(|b| now.saturating_duration_since(b.raised_at) < self.banner_ttl)
    }

    /// The banner, if still visible.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner_at(Instant::now())
    }

    /// Drop the banner once it has expired. Returns `true` if it was cleared.
    pub fn clear_expired_banner(&mut self, now: Instant) -> bool {
        if self.banner.is_some() && self.banner_at(now).is_none() {
            self.banner = None;
            return true;
        }
        false
    }

    // ─── Submission ─────────────────────────────────────────────────────

    /// Submit the current input text.
    ///
    /// # Errors
    /// See [`submit`](Self::submit).
    pub async fn submit_input(&mut self) -> RelayResult<MessageAccepted> {
        let raw = self.input.clone();
        self.submit(&raw).await
    }

    /// Validate, re-attach the stream, POST, and apply the outcome.
    ///
    /// # Errors
    /// [`RelayError::Validation`] for an empty message (no request is sent);
    /// [`RelayError::Request`] when the POST fails.
    pub async fn submit(&mut self, raw: &str) -> RelayResult<MessageAccepted> {
        let message = self.begin_submit(raw)?;
        let outcome = self.client.post_message(&message).await;
        self.complete_submit(outcome)
    }

    /// First half of a submission: validate the text and re-attach the
    /// stream. Returns the trimmed message to POST.
    ///
    /// # Errors
    /// [`RelayError::Validation`] when the message is empty after trimming;
    /// nothing else changes besides the banner.
    pub fn begin_submit(&mut self, raw: &str) -> RelayResult<String> {
        let message = raw.trim();
        if message.is_empty() {
            let err = RelayError::empty_message();
            self.raise_banner(err.banner_text());
            return Err(err);
        }

        self.ensure_stream_connection();
        self.append(LogCategory::Message, format!("Sent: {message}"));
        Ok(message.to_string())
    }

    /// Second half of a submission: apply the POST outcome.
    ///
    /// # Errors
    /// Passes a failed outcome through after raising the banner and tearing
    /// the stream down.
    pub fn complete_submit(
        &mut self,
        outcome: RelayResult<MessageAccepted>,
    ) -> RelayResult<MessageAccepted> {
        match outcome {
            Ok(accepted) => {
                self.append(
                    LogCategory::Api,
                    format!("Message accepted: {}", accepted.message()),
                );
                self.input.clear();
                Ok(accepted)
            }
            Err(err) => {
                let text = err.banner_text();
                tracing::warn!(error = %text, status = ?err.status(), "Submission failed");
                self.raise_banner(text.clone());
                self.append(LogCategory::Error, format!("Request failed: {text}"));
                self.disconnect_stream(REQUEST_FAILED_TEXT, StreamState::Error);
                Err(err)
            }
        }
    }

    fn raise_banner(&mut self, text: String) {
        self.banner = Some(Banner {
            text,
            raised_at: Instant::now(),
        });
    }

    // ─── Connection lifecycle ───────────────────────────────────────────

    /// Replace the current connection with a fresh one and note it in the log.
    pub fn ensure_stream_connection(&mut self) {
        self.connect_stream();
        self.append(LogCategory::Status, ATTACHED_TEXT);
    }

    /// Tear down any existing connection, then open a new one.
    ///
    /// Must be called inside a tokio runtime.
    pub fn connect_stream(&mut self) {
        if self.connection.is_some() {
            self.disconnect_stream(IDLE_TEXT, StreamState::Idle);
        }

        let id = self.next_connection_id;
        self.next_connection_id += 1;
        self.connection = Some(self.client.open_stream(id, self.updates_tx.clone()));
        self.set_status(StreamState::Pending, CONNECTING_TEXT);
        tracing::info!(connection_id = id, url = %self.client.stream_url(), "Stream connecting");
    }

    /// Close the connection (if any) and record the resulting state.
    pub fn disconnect_stream(&mut self, text: &str, state: StreamState) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.set_status(state, text);
    }

    fn set_status(&mut self, state: StreamState, text: &str) {
        self.status = StreamStatus::new(state, text);
    }

    /// Close the connection on shutdown.
    pub fn shutdown(&mut self) {
        self.disconnect_stream(IDLE_TEXT, StreamState::Idle);
    }

    // ─── Stream events ──────────────────────────────────────────────────

    /// Wait for the next stream update that belongs to the current
    /// connection and apply it. Updates from closed connections are skipped.
    ///
    /// Cancel-safe: nothing is lost if the future is dropped while waiting.
    pub async fn pump(&mut self) -> Option<StreamEvent> {
        loop {
            let update = self.updates_rx.recv().await?;
            let event = update.event.clone();
            if self.on_stream_event(update) {
                return Some(event);
            }
        }
    }

    /// Apply one stream update. Returns `false` if it came from a connection
    /// that is no longer current.
    pub fn on_stream_event(&mut self, update: StreamUpdate) -> bool {
        let current = self.connection.as_ref().map(StreamConnection::id);
        if current != Some(update.connection_id) {
            tracing::debug!(
                connection_id = update.connection_id,
                event = update.event.name(),
                "Ignoring event from a closed stream"
            );
            return false;
        }

        match update.event {
            StreamEvent::Open => self.set_status(StreamState::Connected, CONNECTED_TEXT),
            StreamEvent::Keepalive { data } => {
                if let Some(timestamp) = StreamEnvelope::parse(&data).and_then(|e| e.timestamp) {
                    tracing::trace!(server_timestamp = timestamp, "Keepalive");
                }
                self.set_status(StreamState::Connected, KEEPALIVE_TEXT);
            }
            StreamEvent::Message { data } => {
                self.append(LogCategory::Sse, describe_message(&data));
            }
            StreamEvent::Close { data } => self.on_stream_close(&data),
            StreamEvent::Other { name, data } => {
                self.append(LogCategory::Sse, format!("{name}: {data}"));
            }
            StreamEvent::Error { reason } => self.on_stream_error(&reason),
        }
        true
    }

    /// The server finished the burst: log the completion notice and go idle.
    pub fn on_stream_close(&mut self, data: &str) {
        self.append(LogCategory::Status, close_notice(data));
        self.disconnect_stream(COMPLETED_TEXT, StreamState::Idle);
    }

    /// The stream failed or the server hung up: log it and go to error.
    pub fn on_stream_error(&mut self, reason: &str) {
        tracing::warn!(reason, "Stream error");
        self.append(LogCategory::Status, STREAM_ERROR_NOTICE);
        self.disconnect_stream(STREAM_ERROR_TEXT, StreamState::Error);
    }

    fn append(&mut self, category: LogCategory, text: impl Into<String>) {
        self.log.push(LogEntry::new(category, text));
    }
}

impl Drop for StreamFormController {
    fn drop(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
    }
}
