//! Relay protocol domain modules.
//!
//! This namespace groups the wire-compatible structures of the relay service:
//! - [`constants`]: endpoint paths and SSE event names.
//! - [`messages`]: REST request/response bodies.
//! - [`events`]: SSE envelopes and the rules for rendering them as log text.

pub mod constants;
pub mod events;
pub mod messages;
