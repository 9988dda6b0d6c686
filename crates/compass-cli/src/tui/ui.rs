//! Frame layout: tab bar, transcript beside the step checklist, input line, status bar.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Tabs},
};

use super::app::{App, InputMode, ProgressStatus, SelectedTab};
use super::chat;

pub fn render(app: &App, frame: &mut Frame) {
    let [tab_area, main_area, input_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [chat_area, steps_area] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(main_area);

    render_tabs(app, frame, tab_area);
    chat::render(app, frame, chat_area);
    render_steps(app, frame, steps_area);
    render_input(app, frame, input_area);
    render_status_bar(app, frame, status_area);
}

fn render_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let tabs = Tabs::new(SelectedTab::ALL.iter().map(|tab| tab.title()))
        .block(
            Block::default()
                .title(" Career Compass ")
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(app.selected_tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider(" | ");

    frame.render_widget(tabs, area);
}

/// (marker, label) colours for one checklist step.
fn step_styles(status: ProgressStatus) -> (Style, Style) {
    let colour = |c: Color| Style::default().fg(c);
    match status {
        ProgressStatus::Pending => (colour(Color::DarkGray), colour(Color::DarkGray)),
        ProgressStatus::InProgress => (colour(Color::Yellow), colour(Color::Yellow)),
        ProgressStatus::Complete => (colour(Color::Green), colour(Color::White)),
        ProgressStatus::Failed => (colour(Color::Red), colour(Color::Red)),
    }
}

fn render_steps(app: &App, frame: &mut Frame, area: Rect) {
    let title = if app.is_busy() { " Steps (working) " } else { " Steps " };
    let items = app.progress_items().iter().map(|item| {
        let (marker, label) = step_styles(item.status);
        ListItem::new(Line::from(vec![
            Span::styled(format!(" {} ", item.status.icon()), marker),
            Span::styled(item.label.as_str(), label),
        ]))
    });

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(list, area);
}

fn input_hint(tab: SelectedTab) -> &'static str {
    match tab {
        SelectedTab::Advisor => "Press 'i' to ask a question...",
        SelectedTab::Pathway => "Press 'i' to enter a career...",
        SelectedTab::Jobs => "Press 'i' to search, e.g. \"data analyst in Berlin\", or type a listing number",
    }
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;

    let (text, colour) = if editing {
        (app.input_buffer.as_str(), Color::White)
    } else if app.input_buffer.is_empty() {
        (input_hint(app.selected_tab), Color::DarkGray)
    } else {
        (app.input_buffer.as_str(), Color::DarkGray)
    };

    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }));
    let inner = block.inner(area);

    frame.render_widget(Paragraph::new(text).style(Style::default().fg(colour)).block(block), area);

    if editing {
        let typed = app.input_buffer.chars().count() as u16;
        let x = inner.x.saturating_add(typed).min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let keys = match (app.input_mode, app.selected_tab) {
        (InputMode::Editing, _) => "[Enter] Send  [Esc] Cancel",
        (InputMode::Normal, SelectedTab::Advisor) => {
            "[i] Ask  [Tab] Switch  [j/k] Scroll  [s] Save  [c] Clear  [q] Quit"
        }
        (InputMode::Normal, SelectedTab::Pathway) => "[i] Career  [Tab] Switch  [j/k] Scroll  [s] Save  [q] Quit",
        (InputMode::Normal, SelectedTab::Jobs) => "[i] Search  [Tab] Switch  [j/k] Scroll  [q] Quit",
    };

    let info = match &app.status_message {
        Some(message) => message.clone(),
        None => format!("{} ({})", app.current_model(), app.config.llm.provider),
    };

    let status_bar = Paragraph::new(format!("{keys}  |  {info}")).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::{Config, UserProfile};
    use ratatui::backend::TestBackend;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_frame_shows_tabs_steps_and_hint() {
        let app = App::new(Config::default(), UserProfile::default()).unwrap();
        let screen = screen(&app);

        assert!(screen.contains("Career Compass"));
        for tab in SelectedTab::ALL {
            assert!(screen.contains(tab.title()), "missing tab {}", tab.title());
        }
        assert!(screen.contains("Steps"));
        assert!(screen.contains("Press 'i' to ask a question..."));
    }

    #[test]
    fn test_jobs_hint_mentions_listing_numbers() {
        let mut app = App::new(Config::default(), UserProfile::default()).unwrap();
        app.selected_tab = SelectedTab::Jobs;

        assert!(screen(&app).contains("listing number"));
    }
}
