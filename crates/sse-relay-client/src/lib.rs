//! # sse-relay-client
//!
//! Client for a small message relay: submit a message over HTTP, then watch
//! the relay broadcast it back over a Server-Sent-Events stream.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sse_relay_client::{RelayConfig, StreamFormController};
//!
//! #[tokio::main]
//! async fn main() -> sse_relay_client::RelayResult<()> {
//!     // Load config from the environment or sse-relay.toml
//!     let config = RelayConfig::discover(None)?;
//!     let mut controller = StreamFormController::from_config(&config)?;
//!
//!     // Opens the stream, then POSTs the message
//!     controller.submit("hello").await?;
//!
//!     // Apply stream events until the burst is over
//!     while let Some(event) = controller.pump().await {
//!         if event.is_terminal() {
//!             break;
//!         }
//!     }
//!
//!     for entry in controller.log().iter().rev() {
//!         println!("{}", entry.render());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Two-Layer API
//!
//! | Layer | Type | Stream lifecycle | Event log | Best for |
//! |-------|------|------------------|-----------|----------|
//! | Low-level | [`RelayClient`] | Manual | No | Scripts, testing, full control |
//! | High-level | [`StreamFormController`] | Automatic | Yes | Interactive front-ends |
//!
//! ## Configuration
//!
//! See [`RelayConfig`] for the full configuration reference.
//! The simplest setup uses an environment variable:
//!
//! ```bash
//! export SSE_RELAY_URL="http://127.0.0.1:5000"
//! ```
//!
//! Or an `sse-relay.toml` file:
//!
//! ```toml
//! base_url = "http://127.0.0.1:5000"
//!
//! [ui]
//! banner_secs = 3
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod log;
pub mod protocol;
pub mod streams;

// ─── Public re-exports ──────────────────────────────────────────────────

pub use client::RelayClient;
pub use config::RelayConfig;
pub use controller::{Banner, StreamFormController, StreamState, StreamStatus};
pub use error::{RelayError, RelayResult};
pub use log::{EventLog, LogCategory, LogEntry};
pub use protocol::events::{StreamEvent, StreamUpdate};
pub use protocol::messages::{MessageAccepted, PingResponse};
pub use streams::{ConnectionProbe, StreamConnection};
