//! SSE stream events and the rules for rendering them as log text.
//!
//! Every frame on the wire carries a JSON envelope:
//!
//! ```text
//! event: message
//! data: {"timestamp": 1718000000.5, "data": {"message": "hi", "sequence": 1, "total": 3}}
//! ```
//!
//! Payload fields are optional and loosely typed, so rendering works on
//! [`serde_json::Value`] with JavaScript-style truthiness rather than on
//! strict structs: a missing, `null`, `0`, `false` or `""` field is treated
//! as absent.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::constants::Events;

/// Fallback close notice when the payload names no message.
pub const CLOSE_NOTICE: &str = "Stream completed.";

/// One event delivered by (or synthesised for) an SSE connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// The stream response arrived with a success status.
    Open,
    /// Liveness frame.
    Keepalive { data: String },
    /// A broadcast message; `data` is the raw frame payload.
    Message { data: String },
    /// End-of-burst marker.
    Close { data: String },
    /// Any other named event.
    Other { name: String, data: String },
    /// Transport failure, non-2xx status, or the server ended the body.
    Error { reason: String },
}

impl StreamEvent {
    /// Classify a decoded SSE frame by its `event:` name.
    ///
    /// An empty name is the SSE default, `message`.
    pub fn from_frame(name: &str, data: String) -> Self {
        match name {
            "" | Events::MESSAGE => StreamEvent::Message { data },
            Events::KEEPALIVE => StreamEvent::Keepalive { data },
            Events::CLOSE => StreamEvent::Close { data },
            other => StreamEvent::Other {
                name: other.to_string(),
                data,
            },
        }
    }

    /// Event type name as it would appear on the wire.
    pub fn name(&self) -> &str {
        match self {
            StreamEvent::Open => Events::OPEN,
            StreamEvent::Keepalive { .. } => Events::KEEPALIVE,
            StreamEvent::Message { .. } => Events::MESSAGE,
            StreamEvent::Close { .. } => Events::CLOSE,
            StreamEvent::Other { name, .. } => name,
            StreamEvent::Error { .. } => Events::ERROR,
        }
    }

    /// Returns `true` for events after which the connection is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Close { .. } | StreamEvent::Error { .. })
    }
}

/// A stream event tagged with the connection that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUpdate {
    pub connection_id: u64,
    pub event: StreamEvent,
}

/// Typed view of the frame envelope, for consumers that want the
/// server timestamp.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEnvelope {
    /// Seconds since the Unix epoch, as a float.
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl StreamEnvelope {
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// JavaScript truthiness for JSON values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Largest magnitude JavaScript still prints as a plain integer.
const JS_PLAIN_INTEGER_LIMIT: f64 = 1e21;

/// Rewrite whole-number floats (`1.0`) as integers (`1`), recursively, so
/// JSON text matches what JavaScript would print for the same payload.
fn js_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < JS_PLAIN_INTEGER_LIMIT)
            .and_then(|f| format!("{f:.0}").parse::<serde_json::Number>().ok())
            .map_or_else(|| value.clone(), Value::Number),
        Value::Array(items) => Value::Array(items.iter().map(js_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), js_numbers(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render a value the way string interpolation would: strings verbatim,
/// everything else as JSON text with JavaScript number formatting.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => js_numbers(other).to_string(),
    }
}

fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| is_truthy(v))
}

/// Build the log text for a `message` event payload.
///
/// `{"data": {"message": "hi", "sequence": 1, "total": 3}}` renders as
/// `hi (1/3)`. When neither part is present the JSON of `data` is shown;
/// when the payload is not JSON at all the raw text is shown.
pub fn describe_message(raw: &str) -> String {
    let payload = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) | Err(_) => return raw.to_string(),
        Ok(payload) => payload,
    };

    let details = truthy_field(&payload, "data")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let mut parts = Vec::with_capacity(2);
    if let Some(message) = truthy_field(&details, "message") {
        parts.push(display_value(message));
    }
    if let (Some(sequence), Some(total)) = (
        truthy_field(&details, "sequence"),
        truthy_field(&details, "total"),
    ) {
        parts.push(format!(
            "({}/{})",
            display_value(sequence),
            display_value(total)
        ));
    }

    let text = parts.join(" ").trim().to_string();
    if text.is_empty() {
        display_value(&details)
    } else {
        text
    }
}

/// Build the log text for a `close` event payload.
pub fn close_notice(raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .as_ref()
        .and_then(|payload| truthy_field(payload, "data"))
        .and_then(|data| truthy_field(data, "message"))
        .map_or_else(
            || CLOSE_NOTICE.to_string(),
            |message| format!("Stream completed for \"{}\".", display_value(message)),
        )
}
