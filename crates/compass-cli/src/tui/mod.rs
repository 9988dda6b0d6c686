//! Interactive terminal UI for `compass chat`.
//!
//! Provides:
//! - Advisor, Pathway and Jobs tabs
//! - Chat input/output display
//! - Progress checklist
//! - Streaming advisor replies

mod app;
mod chat;
mod event;
mod ui;

use color_eyre::eyre::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;

use app::App;
use compass_core::{Config, UserProfile};

/// Run the TUI application.
pub async fn run(config: Config, profile: UserProfile) -> Result<()> {
    // Build clients before touching the terminal so errors print normally
    let mut app = App::new(config, profile)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
