//! Protocol constants for endpoint paths and SSE event names.

/// Default endpoint paths exposed by the relay.
pub struct Paths;

impl Paths {
    /// Submit a message (`POST`), broadcast to stream listeners on success.
    pub const MESSAGES: &'static str = "/api/messages";

    /// Server-Sent-Events feed (`GET`).
    pub const STREAM: &'static str = "/stream";

    /// Heartbeat (`GET`).
    pub const PING: &'static str = "/api/ping";

    /// Push a message straight into the stream queue (`POST`).
    pub const PUBLISH: &'static str = "/publish";
}

/// SSE event type names.
pub struct Events;

impl Events {
    /// Synthesised when the stream response arrives; never sent by the server.
    pub const OPEN: &'static str = "open";

    /// Periodic liveness frame, sent after ~15 s of queue silence.
    pub const KEEPALIVE: &'static str = "keepalive";

    /// A broadcast message. Also the SSE default when no `event:` line is sent.
    pub const MESSAGE: &'static str = "message";

    /// The server finished the burst for a submission.
    pub const CLOSE: &'static str = "close";

    /// Synthesised on transport failure or when the server ends the body.
    pub const ERROR: &'static str = "error";
}

/// MIME type of the SSE feed.
pub const EVENT_STREAM_MIME: &str = "text/event-stream";
