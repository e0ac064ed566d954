//! Top-level TUI layout and rendering entry point.
//!
//! Composes the status bar, message input, feedback line, event log, and
//! key-help footer into the full-screen layout drawn each frame.

pub mod input;
pub mod log;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

/// Render the entire TUI frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Top-level vertical split:
    //   [1] Status bar (1 line)
    //   [2] Input box  (3 lines)
    //   [3] Feedback   (1 line)
    //   [4] Event log  (fill)
    //   [5] Key help   (1 line)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // input
            Constraint::Length(1), // feedback banner
            Constraint::Min(5),    // event log
            Constraint::Length(1), // key help
        ])
        .split(area);

    status_bar::draw(frame, app, chunks[0]);
    input::draw(frame, app, chunks[1]);
    input::draw_feedback(frame, app, chunks[2]);
    log::draw(frame, app, chunks[3]);
    draw_key_help(frame, chunks[4]);
}

/// Render the bottom key-help bar.
fn draw_key_help(frame: &mut Frame, area: ratatui::layout::Rect) {
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let spans = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Send  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Clear  "),
        Span::styled("↑↓ PgUp PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Scroll  "),
        Span::styled("Home", Style::default().fg(Color::Yellow)),
        Span::raw(" Newest  "),
        Span::styled("Ctrl+C", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    let help = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
