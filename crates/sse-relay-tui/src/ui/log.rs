//! Event log panel: newest entry first, coloured by category.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use sse_relay_client::LogCategory;

use crate::app::App;

fn category_color(category: LogCategory) -> Color {
    match category {
        LogCategory::Message => Color::White,
        LogCategory::Api => Color::Cyan,
        LogCategory::Sse => Color::Green,
        LogCategory::Status => Color::Yellow,
        LogCategory::Error => Color::Red,
    }
}

/// Render the event log.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let log = app.controller.log();
    let block = Block::default()
        .title(format!(" Events ({} entries) ", log.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if log.is_empty() {
        let msg =
            Paragraph::new("  No events yet.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(msg, inner);
        return;
    }

    let visible_height = usize::from(inner.height);
    let total = log.len();
    let scroll = usize::from(app.scroll_offset).min(total.saturating_sub(visible_height));

    let lines: Vec<Line<'_>> = log
        .iter()
        .skip(scroll)
        .take(visible_height)
        .map(|entry| {
            let color = category_color(entry.category);
            Line::from(vec![
                Span::styled(
                    format!(" {} ", entry.time_label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<7}", entry.category.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(entry.text.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
