//! Application events consumed by the TUI main loop.
//!
//! Terminal input arrives via crossterm's `EventStream`, ticks from a
//! periodic timer, and submission results from the task that performs the
//! POST. Stream updates do not pass through here: the controller owns its
//! own channel and the main loop polls it directly.

use sse_relay_client::{MessageAccepted, RelayResult};

/// Every event the TUI main loop can receive.
#[derive(Debug)]
pub enum AppEvent {
    /// A crossterm terminal event (key press, mouse, resize).
    Terminal(crossterm::event::Event),
    /// Render tick; also expires the feedback banner.
    Tick,
    /// The POST started by a submission has finished.
    SubmitFinished(RelayResult<MessageAccepted>),
    /// Request application quit.
    Quit,
}
