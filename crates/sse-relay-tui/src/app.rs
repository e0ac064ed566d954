//! Application state for the TUI.
//!
//! [`App`] wraps the [`StreamFormController`] and adds what only a terminal
//! front-end needs: key handling, log scrolling, and the bookkeeping for
//! POSTs running on background tasks.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sse_relay_client::StreamFormController;
use tokio::sync::mpsc;

use crate::event::AppEvent;

/// Lines moved by PageUp / PageDown.
const PAGE_SCROLL: u16 = 10;

/// All mutable TUI state.
pub struct App {
    pub controller: StreamFormController,
    /// Event channel, for spawning async work from key handlers.
    tx: mpsc::UnboundedSender<AppEvent>,
    /// POSTs started but not yet finished.
    pub pending_submits: usize,
    /// Offset from the newest log entry.
    pub scroll_offset: u16,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: StreamFormController, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            controller,
            tx,
            pending_submits: 0,
            scroll_offset: 0,
            should_quit: false,
        }
    }

    /// Process an incoming [`AppEvent`], updating state accordingly.
    ///
    /// Returns `true` if the app should quit.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Terminal(crossterm::event::Event::Key(key))
                if key.kind == KeyEventKind::Press =>
            {
                self.handle_key(key);
            }
            AppEvent::Tick => {
                self.controller.clear_expired_banner(Instant::now());
            }
            AppEvent::SubmitFinished(outcome) => {
                self.pending_submits = self.pending_submits.saturating_sub(1);
                // Failures are already reflected in the banner and log.
                if let Err(e) = self.controller.complete_submit(outcome) {
                    tracing::debug!(error = %e, "Submission rejected");
                }
                self.scroll_offset = 0;
            }
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Terminal(_) => {}
        }
        self.should_quit
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Global: Ctrl+C quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.controller.input_mut().clear(),
            KeyCode::Backspace => {
                self.controller.input_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.controller.input_mut().push(c);
            }

            // Scrolling (0 = newest)
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(PAGE_SCROLL),
            KeyCode::PageDown => self.scroll_down(PAGE_SCROLL),
            KeyCode::Home => self.scroll_offset = 0,

            _ => {}
        }
    }

    /// Scroll towards older entries, stopping at the oldest one.
    fn scroll_down(&mut self, lines: u16) {
        let oldest =
            u16::try_from(self.controller.log().len().saturating_sub(1)).unwrap_or(u16::MAX);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(oldest);
    }

    /// Validate and re-attach the stream synchronously, then run the POST
    /// on a background task that reports back with
    /// [`AppEvent::SubmitFinished`].
    fn submit(&mut self) {
        let raw = self.controller.input().to_string();
        let Ok(message) = self.controller.begin_submit(&raw) else {
            return;
        };

        self.pending_submits += 1;
        self.scroll_offset = 0;

        let client = self.controller.client().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = client.post_message(&message).await;
            let _ = tx.send(AppEvent::SubmitFinished(outcome));
        });
    }
}
