//! Status bar widget: always-visible top line showing the stream state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use sse_relay_client::StreamState;

use crate::app::App;

/// Colour used for a stream state everywhere in the UI.
pub fn state_color(state: StreamState) -> Color {
    match state {
        StreamState::Idle => Color::DarkGray,
        StreamState::Pending => Color::Yellow,
        StreamState::Connected => Color::Green,
        StreamState::Error => Color::Red,
    }
}

/// Render the status bar.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.controller.status();
    let color = state_color(status.state);

    let mut spans = vec![
        Span::styled(
            " SSE Relay ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled("●", Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(
            status.state.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::raw(status.text.as_str()),
        Span::raw(" │ "),
        Span::styled(
            app.controller.client().base_url(),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if app.pending_submits > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("sending ({})", app.pending_submits),
            Style::default().fg(Color::Yellow),
        ));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(bar, area);
}
