//! # Stream Connection
//!
//! [`StreamConnection`] is the live handle for one SSE session. Opening it
//! spawns a reader task that performs `GET /stream`, decodes the body with
//! `eventsource-stream`, and forwards every frame as a [`StreamUpdate`]
//! tagged with the connection id:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ reader task (one per connection)                          │
//! │                                                           │
//! │   GET /stream ─┬─ 2xx text/event-stream ──► Open          │
//! │                │          frames ──► Keepalive            │
//! │                │                     Message              │
//! │                │                     Close / Other        │
//! │                │          end of body ──► Error           │
//! │                └─ failure / non-2xx / other type ─► Error │
//! │                                                           │
//! │   updates_tx ──► controller (single consumer)             │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Closing the handle is the only cancellation primitive: it flips a shared
//! flag and aborts the reader. Updates already queued carry the old id and
//! are discarded by the controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::constants::EVENT_STREAM_MIME;
use crate::protocol::events::{StreamEvent, StreamUpdate};

/// Sender half of the channel stream updates are delivered on.
pub type UpdateSender = mpsc::UnboundedSender<StreamUpdate>;

/// Receiver half of the channel stream updates are delivered on.
pub type UpdateReceiver = mpsc::UnboundedReceiver<StreamUpdate>;

/// Live handle to an open SSE session.
pub struct StreamConnection {
    id: u64,
    url: String,
    closed: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

/// Cheap observer of a connection's lifetime, usable after the handle
/// itself has been dropped.
#[derive(Debug, Clone)]
pub struct ConnectionProbe {
    id: u64,
    closed: Arc<AtomicBool>,
}

impl ConnectionProbe {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl StreamConnection {
    /// Spawn the reader task for `url`. Must be called inside a tokio runtime.
    pub(crate) fn spawn(
        http: reqwest::Client,
        url: String,
        id: u64,
        updates: UpdateSender,
    ) -> Self {
        let closed = Arc::new(AtomicBool::new(false));
        let reader = tokio::spawn(reader_loop(
            http,
            url.clone(),
            id,
            updates,
            Arc::clone(&closed),
        ));

        Self {
            id,
            url,
            closed,
            reader: Some(reader),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn probe(&self) -> ConnectionProbe {
        ConnectionProbe {
            id: self.id,
            closed: Arc::clone(&self.closed),
        }
    }

    /// Close the connection. Idempotent.
    pub fn close(&mut self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        tracing::info!(connection_id = self.id, url = %self.url, "Stream connection closed");
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for StreamConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConnection")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Body of the reader task.
async fn reader_loop(
    http: reqwest::Client,
    url: String,
    connection_id: u64,
    updates: UpdateSender,
    closed: Arc<AtomicBool>,
) {
    // Returns false once nobody should hear from this connection again.
    let emit = |event: StreamEvent| {
        if closed.load(Ordering::SeqCst) {
            return false;
        }
        updates
            .send(StreamUpdate {
                connection_id,
                event,
            })
            .is_ok()
    };

    let response = match http
        .get(&url)
        .header(ACCEPT, EVENT_STREAM_MIME)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(connection_id, url = %url, "Stream request failed: {}", e);
            emit(StreamEvent::Error {
                reason: e.to_string(),
            });
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(connection_id, url = %url, %status, "Stream endpoint returned an error status");
        emit(StreamEvent::Error {
            reason: format!("Stream request returned HTTP {status}"),
        });
        return;
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !is_event_stream(content_type) {
        tracing::warn!(connection_id, url = %url, content_type, "Stream endpoint did not answer with an event stream");
        emit(StreamEvent::Error {
            reason: format!("Unexpected stream content type '{content_type}'"),
        });
        return;
    }

    tracing::info!(connection_id, url = %url, "Stream connected");
    if !emit(StreamEvent::Open) {
        return;
    }

    let mut frames = std::pin::pin!(response.bytes_stream().eventsource());
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(frame) => {
                tracing::debug!(connection_id, event = %frame.event, data = %frame.data, "SSE frame");
                if !emit(StreamEvent::from_frame(&frame.event, frame.data)) {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(connection_id, "Failed to decode SSE stream: {}", e);
                emit(StreamEvent::Error {
                    reason: format!("Stream decode error: {e}"),
                });
                return;
            }
        }
    }

    tracing::info!(connection_id, "Stream ended by server");
    emit(StreamEvent::Error {
        reason: "Server closed the stream".into(),
    });
}

/// `true` for `text/event-stream`, ignoring case and parameters such as
/// `charset`.
fn is_event_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(EVENT_STREAM_MIME))
}
