//! Transcript pane for the selected tab.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::tui::app::{App, MessageRole, SelectedTab};

const INDENT: &str = "        ";

/// Render the current tab's messages, newest at the bottom.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.selected_tab.title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.messages() {
        let (prefix_style, content_style) = match msg.role {
            MessageRole::User => (
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            ),
            MessageRole::Assistant => (
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            ),
            MessageRole::System => (Style::default().fg(Color::Yellow), Style::default().fg(Color::DarkGray)),
        };

        let prefix = format!("{} {}", msg.timestamp.format("%H:%M"), msg.role.as_str());
        lines.push(Line::from(Span::styled(prefix, prefix_style)));
        lines.extend(
            msg.content
                .lines()
                .map(|line| Line::from(vec![Span::raw(INDENT), Span::styled(line, content_style)])),
        );
        lines.push(Line::default());
    }

    // Partial advisor reply
    if app.selected_tab == SelectedTab::Advisor && !app.stream_buffer.is_empty() {
        lines.push(Line::from(Span::styled(
            MessageRole::Assistant.as_str(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.extend(app.stream_buffer.lines().map(|line| {
            Line::from(vec![Span::raw(INDENT), Span::styled(line, Style::default().fg(Color::White))])
        }));
    }

    // Stick to the bottom unless the user scrolled up
    let visible_height = inner_area.height as usize;
    let end = lines.len().saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(visible_height);
    let visible: Vec<Line> = lines.into_iter().skip(start).take(end - start).collect();

    let chat = Paragraph::new(visible).wrap(Wrap { trim: false });
    frame.render_widget(chat, inner_area);
}
