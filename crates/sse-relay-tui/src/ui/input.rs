//! Message input box and the feedback line under it.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

const HINT: &str = " Type a message and press Enter to trigger the stream.";

/// Render the input box and place the cursor after the text.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Message ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);

    let input = app.controller.input();
    let width = usize::from(inner.width.saturating_sub(1));
    let chars = input.chars().count();

    // Keep the tail visible when the text is wider than the box.
    let visible: String = input.chars().skip(chars.saturating_sub(width)).collect();
    let cursor_x = u16::try_from(visible.chars().count()).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(visible).block(block), area);
    frame.set_cursor_position(Position::new(
        inner.x.saturating_add(cursor_x),
        inner.y,
    ));
}

/// Render the transient banner, or a dim hint when there is none.
pub fn draw_feedback(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.controller.banner() {
        Some(banner) => Paragraph::new(format!(" {}", banner.text)).style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        None => Paragraph::new(HINT).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(line, area);
}
