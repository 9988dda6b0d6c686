//! Application state and main event loop.

use std::io::Stdout;
use std::sync::Arc;

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use compass_core::advisor::Speaker;
use compass_core::llm::StreamChunk;
use compass_core::pathway::{GraphProgress, PATHWAY_NODES};
use compass_core::{
    generate_pathway, CareerAdvisor, CareerPathway, Config, Conversation, DuckDuckGo, FileStorage,
    JobListing, JobSearch, Storage, UserProfile, ADVICE_FALLBACK, LLM,
};

use super::event::{Event, EventHandler};
use super::ui;
use crate::commands::build_llm;

/// Checklist labels for the pathway graph, in node order.
const PATHWAY_STEPS: [&str; 5] = [
    "Entry-level roles",
    "Mid-level roles",
    "Senior roles",
    "Skills progression",
    "Writing the pathway",
];

/// The selected tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectedTab {
    #[default]
    Advisor,
    Pathway,
    Jobs,
}

impl SelectedTab {
    pub const ALL: [SelectedTab; 3] = [SelectedTab::Advisor, SelectedTab::Pathway, SelectedTab::Jobs];

    pub fn next(self) -> Self {
        match self {
            Self::Advisor => Self::Pathway,
            Self::Pathway => Self::Jobs,
            Self::Jobs => Self::Advisor,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Advisor => Self::Jobs,
            Self::Pathway => Self::Advisor,
            Self::Jobs => Self::Pathway,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Advisor => "Advisor",
            Self::Pathway => "Pathway",
            Self::Jobs => "Jobs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Advisor => 0,
            Self::Pathway => 1,
            Self::Jobs => 2,
        }
    }

    fn welcome(self) -> &'static str {
        match self {
            Self::Advisor => "Ask anything about careers, education or the job market.",
            Self::Pathway => "Type a career (e.g. Data Science) to map its progression.",
            Self::Jobs => "Search with e.g. \"data analyst in Berlin\", then type a result number for details.",
        }
    }

    fn progress_labels(self) -> &'static [&'static str] {
        match self {
            Self::Advisor => &["Building profile context", "Asking the model", "Streaming reply"],
            Self::Pathway => &PATHWAY_STEPS,
            Self::Jobs => &["Searching the web", "Fetching job page"],
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// A chat message in the conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => Speaker::User.label(),
            Self::Assistant => Speaker::Assistant.label(),
            Self::System => "System",
        }
    }
}

/// Status of a progress item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
    Failed,
}

impl ProgressStatus {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::InProgress => "◐",
            Self::Complete => "●",
            Self::Failed => "✗",
        }
    }
}

/// A progress item in the checklist.
#[derive(Debug, Clone)]
pub struct ProgressItem {
    pub label: String,
    pub status: ProgressStatus,
}

impl ProgressItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: ProgressStatus::Pending,
        }
    }
}

/// Main application state.
pub struct App {
    pub selected_tab: SelectedTab,
    pub input_mode: InputMode,
    pub input_buffer: String,
    /// Reply text received so far from the advisor
    pub stream_buffer: String,
    pub should_quit: bool,
    /// Lines scrolled up from the bottom of the chat
    pub scroll_offset: usize,
    pub config: Config,
    pub profile: UserProfile,
    pub status_message: Option<String>,
    /// Per tab, indexed by [`SelectedTab::index`]
    messages: [Vec<ChatMessage>; 3],
    progress: [Vec<ProgressItem>; 3],
    busy: [bool; 3],
    llm: Arc<dyn LLM>,
    jobs: Arc<JobSearch<DuckDuckGo>>,
    storage: FileStorage,
    conversation: Conversation,
    pending_question: Option<String>,
    pathway: Option<CareerPathway>,
    listings: Vec<JobListing>,
}

impl App {
    pub fn new(config: Config, profile: UserProfile) -> Result<Self> {
        let llm = build_llm(&config)?;
        let engine = DuckDuckGo::from_config(&config.search)?;
        let jobs = Arc::new(JobSearch::from_config(engine, &config));
        let storage = FileStorage::with_config(&config.storage);

        let mut app = Self {
            selected_tab: SelectedTab::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            stream_buffer: String::new(),
            should_quit: false,
            scroll_offset: 0,
            config,
            profile,
            status_message: None,
            messages: Default::default(),
            progress: Default::default(),
            busy: [false; 3],
            llm,
            jobs,
            storage,
            conversation: Conversation::new(),
            pending_question: None,
            pathway: None,
            listings: Vec::new(),
        };

        for tab in SelectedTab::ALL {
            app.messages[tab.index()].push(ChatMessage::system(tab.welcome()));
            app.reset_progress(tab);
        }
        if app.profile != UserProfile::default() {
            let context = app.profile.context_block();
            app.messages[SelectedTab::Advisor.index()].push(ChatMessage::system(context));
        }

        Ok(app)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages[self.selected_tab.index()]
    }

    pub fn progress_items(&self) -> &[ProgressItem] {
        &self.progress[self.selected_tab.index()]
    }

    pub fn is_busy(&self) -> bool {
        self.busy[self.selected_tab.index()]
    }

    pub fn current_model(&self) -> String {
        self.config.llm.model_or_default()
    }

    fn push(&mut self, tab: SelectedTab, message: ChatMessage) {
        self.messages[tab.index()].push(message);
        if tab == self.selected_tab {
            self.scroll_offset = 0;
        }
    }

    fn reset_progress(&mut self, tab: SelectedTab) {
        self.progress[tab.index()] = tab.progress_labels().iter().map(|l| ProgressItem::new(*l)).collect();
    }

    fn set_progress_status(&mut self, tab: SelectedTab, index: usize, status: ProgressStatus) {
        if let Some(item) = self.progress[tab.index()].get_mut(index) {
            item.status = status;
        }
    }

    /// Marks whatever was running on `tab` as failed.
    fn fail_progress(&mut self, tab: SelectedTab) {
        for item in &mut self.progress[tab.index()] {
            if item.status == ProgressStatus::InProgress {
                item.status = ProgressStatus::Failed;
            }
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut events = EventHandler::new();

        loop {
            terminal.draw(|frame| ui::render(self, frame))?;

            if let Some(event) = events.next().await {
                self.handle_event(event, events.sender());
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event, event_tx: mpsc::UnboundedSender<Event>) {
        match event {
            Event::Key(key) => self.handle_key_event(key, event_tx),
            Event::Tick => {}
            Event::StreamChunk(text) => {
                // Chunks can trail a failure; drop them once the turn is closed.
                if self.pending_question.is_some() {
                    self.set_progress_status(SelectedTab::Advisor, 1, ProgressStatus::Complete);
                    self.set_progress_status(SelectedTab::Advisor, 2, ProgressStatus::InProgress);
                    self.stream_buffer.push_str(&text);
                }
            }
            Event::StreamComplete => {
                let reply = std::mem::take(&mut self.stream_buffer);
                if reply.trim().is_empty() {
                    self.finish_advice(ADVICE_FALLBACK.to_string(), false);
                } else {
                    self.finish_advice(reply, true);
                }
            }
            Event::StreamFailed(error) => {
                tracing::error!(%error, "tui.advisor.failed");
                self.stream_buffer.clear();
                self.finish_advice(ADVICE_FALLBACK.to_string(), false);
            }
            Event::PathwayProgress(progress) => self.handle_pathway_progress(progress),
            Event::PathwayComplete(pathway) => self.handle_pathway_complete(*pathway),
            Event::JobsFound(listings) => self.handle_jobs_found(listings),
            Event::JobLoaded { index, listing } => self.handle_job_loaded(index, *listing),
        }
    }

    fn finish_advice(&mut self, reply: String, ok: bool) {
        let Some(question) = self.pending_question.take() else {
            return;
        };

        self.conversation.push(Speaker::User, question);
        self.conversation.push(Speaker::Assistant, reply.clone());
        self.push(SelectedTab::Advisor, ChatMessage::assistant(reply));

        if ok {
            for i in 0..3 {
                self.set_progress_status(SelectedTab::Advisor, i, ProgressStatus::Complete);
            }
        } else {
            self.fail_progress(SelectedTab::Advisor);
        }
        self.busy[SelectedTab::Advisor.index()] = false;
    }

    fn handle_pathway_progress(&mut self, progress: GraphProgress) {
        let (node, status) = match &progress {
            GraphProgress::NodeStarted(node) => (node, ProgressStatus::InProgress),
            GraphProgress::NodeFinished(node) => (node, ProgressStatus::Complete),
            GraphProgress::NodeFailed(node) => (node, ProgressStatus::Failed),
        };
        if let Some(index) = PATHWAY_NODES.iter().position(|n| *n == node.as_str()) {
            self.set_progress_status(SelectedTab::Pathway, index, status);
        }
    }

    fn handle_pathway_complete(&mut self, pathway: CareerPathway) {
        self.busy[SelectedTab::Pathway.index()] = false;
        self.push(SelectedTab::Pathway, ChatMessage::assistant(&pathway.markdown));

        if pathway.complete {
            self.status_message = Some("Pathway ready. [s] saves it as a report".to_string());
            self.pathway = Some(pathway);
        } else {
            self.fail_progress(SelectedTab::Pathway);
            self.push(
                SelectedTab::Pathway,
                ChatMessage::system("The model could not be reached. Check your API key and try again."),
            );
        }
    }

    fn handle_jobs_found(&mut self, listings: Vec<JobListing>) {
        self.busy[SelectedTab::Jobs.index()] = false;

        if listings.is_empty() {
            self.fail_progress(SelectedTab::Jobs);
            self.push(
                SelectedTab::Jobs,
                ChatMessage::system("No jobs found. Try a broader query or a different location."),
            );
        } else {
            self.set_progress_status(SelectedTab::Jobs, 0, ProgressStatus::Complete);
            let lines: Vec<String> = listings
                .iter()
                .enumerate()
                .map(|(i, job)| format!("{}. {} at {} ({}, {})", i + 1, job.title, job.company, job.location, job.source))
                .collect();
            self.push(SelectedTab::Jobs, ChatMessage::assistant(lines.join("\n")));
        }
        self.listings = listings;
    }

    fn handle_job_loaded(&mut self, index: usize, listing: JobListing) {
        self.busy[SelectedTab::Jobs.index()] = false;

        let Some(details) = &listing.details else {
            return;
        };
        let status = if details.placeholder { ProgressStatus::Failed } else { ProgressStatus::Complete };
        self.set_progress_status(SelectedTab::Jobs, 1, status);

        let mut text = format!("{} at {}\n{}\n\n", listing.title, listing.company, listing.url);
        text.push_str(&details.to_markdown());
        self.push(SelectedTab::Jobs, ChatMessage::assistant(text));

        if let Some(slot) = self.listings.get_mut(index) {
            *slot = listing;
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, event_tx: mpsc::UnboundedSender<Event>) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode_key(key),
            InputMode::Editing => self.handle_editing_mode_key(key, event_tx),
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Right => {
                self.selected_tab = self.selected_tab.next();
                self.scroll_offset = 0;
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.selected_tab = self.selected_tab.previous();
                self.scroll_offset = 0;
            }
            KeyCode::Char('i') | KeyCode::Enter => {
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('s') => self.save_report(),
            KeyCode::Char('c') if self.selected_tab == SelectedTab::Advisor && !self.is_busy() => {
                self.conversation.clear();
                self.messages[SelectedTab::Advisor.index()] =
                    vec![ChatMessage::system(SelectedTab::Advisor.welcome())];
                self.reset_progress(SelectedTab::Advisor);
                self.status_message = Some("Conversation cleared".to_string());
            }
            _ => {}
        }
    }

    fn handle_editing_mode_key(&mut self, key: KeyEvent, event_tx: mpsc::UnboundedSender<Event>) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => self.submit_input(event_tx),
            KeyCode::Char(c) => self.input_buffer.push(c),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, event_tx: mpsc::UnboundedSender<Event>) {
        if self.input_buffer.trim().is_empty() {
            return;
        }
        if self.is_busy() {
            self.status_message = Some("Still working on the last request".to_string());
            return;
        }

        let input = std::mem::take(&mut self.input_buffer).trim().to_string();
        let tab = self.selected_tab;
        self.push(tab, ChatMessage::user(&input));
        self.status_message = None;

        match tab {
            SelectedTab::Advisor => self.start_advice(input, event_tx),
            SelectedTab::Pathway => self.start_pathway(input, event_tx),
            SelectedTab::Jobs => match self.listing_number(&input) {
                Some(index) => self.load_job(index, event_tx),
                None => self.start_job_search(&input, event_tx),
            },
        }

        self.input_mode = InputMode::Normal;
    }

    /// A 1-based listing number typed on the Jobs tab.
    fn listing_number(&self, input: &str) -> Option<usize> {
        let n: usize = input.parse().ok()?;
        (1..=self.listings.len()).contains(&n).then(|| n - 1)
    }

    fn start_advice(&mut self, question: String, event_tx: mpsc::UnboundedSender<Event>) {
        self.busy[SelectedTab::Advisor.index()] = true;
        self.stream_buffer.clear();
        self.reset_progress(SelectedTab::Advisor);
        self.set_progress_status(SelectedTab::Advisor, 0, ProgressStatus::Complete);
        self.set_progress_status(SelectedTab::Advisor, 1, ProgressStatus::InProgress);
        self.pending_question = Some(question.clone());

        let advisor = CareerAdvisor::new(Arc::clone(&self.llm));
        let profile = self.profile.clone();
        let (stream_tx, mut stream_rx) = mpsc::unbounded_channel::<StreamChunk>();

        let forward_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(chunk) = stream_rx.recv().await {
                let event = if chunk.is_final {
                    Event::StreamComplete
                } else {
                    Event::StreamChunk(chunk.text)
                };
                if forward_tx.send(event).is_err() {
                    break;
                }
            }
        });

        tokio::spawn(async move {
            if let Err(e) = advisor.advise_streaming(&question, &profile, stream_tx).await {
                let _ = event_tx.send(Event::StreamFailed(e.to_string()));
            }
        });
    }

    fn start_pathway(&mut self, career: String, event_tx: mpsc::UnboundedSender<Event>) {
        self.busy[SelectedTab::Pathway.index()] = true;
        self.reset_progress(SelectedTab::Pathway);
        self.push(SelectedTab::Pathway, ChatMessage::system(format!("Mapping the {career} pathway...")));

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<GraphProgress>();
        let forward_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                let _ = forward_tx.send(Event::PathwayProgress(progress));
            }
        });

        let llm = Arc::clone(&self.llm);
        tokio::spawn(async move {
            let pathway = generate_pathway(&career, llm, Some(progress_tx)).await;
            let _ = event_tx.send(Event::PathwayComplete(Box::new(pathway)));
        });
    }

    fn start_job_search(&mut self, input: &str, event_tx: mpsc::UnboundedSender<Event>) {
        self.busy[SelectedTab::Jobs.index()] = true;
        self.reset_progress(SelectedTab::Jobs);
        self.set_progress_status(SelectedTab::Jobs, 0, ProgressStatus::InProgress);

        let (query, location) = match input.split_once(" in ") {
            Some((query, location)) => (query.trim().to_string(), Some(location.trim().to_string())),
            None => (input.to_string(), None),
        };
        let limit = self.config.search.max_results;
        let jobs = Arc::clone(&self.jobs);

        tokio::spawn(async move {
            let listings = jobs.search_jobs(&query, location.as_deref(), limit).await;
            let _ = event_tx.send(Event::JobsFound(listings));
        });
    }

    fn load_job(&mut self, index: usize, event_tx: mpsc::UnboundedSender<Event>) {
        let mut listing = self.listings[index].clone();
        self.busy[SelectedTab::Jobs.index()] = true;
        self.set_progress_status(SelectedTab::Jobs, 1, ProgressStatus::InProgress);
        self.push(SelectedTab::Jobs, ChatMessage::system(format!("Loading {}...", listing.url)));

        let jobs = Arc::clone(&self.jobs);
        tokio::spawn(async move {
            jobs.load_details(&mut listing).await;
            let _ = event_tx.send(Event::JobLoaded {
                index,
                listing: Box::new(listing),
            });
        });
    }

    /// Saves the current tab's result under the reports directory.
    fn save_report(&mut self) {
        let report = match self.selected_tab {
            SelectedTab::Advisor if !self.conversation.is_empty() => {
                Some(("Career Chat".to_string(), self.conversation.to_markdown()))
            }
            SelectedTab::Pathway => self
                .pathway
                .as_ref()
                .map(|p| (format!("Career Pathway: {}", p.state.career), p.markdown.clone())),
            _ => None,
        };

        let Some((name, markdown)) = report else {
            self.status_message = Some("Nothing to save on this tab".to_string());
            return;
        };

        self.status_message = Some(match self.storage.save_report(&name, &markdown) {
            Ok(path) => format!("Saved to {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "tui.save_failed");
                format!("Save failed: {e}")
            }
        });
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        let mut tab = SelectedTab::Advisor;
        for expected in [SelectedTab::Pathway, SelectedTab::Jobs, SelectedTab::Advisor] {
            tab = tab.next();
            assert_eq!(tab, expected);
        }
        assert_eq!(SelectedTab::Advisor.previous(), SelectedTab::Jobs);
    }

    #[test]
    fn test_pathway_checklist_matches_graph() {
        assert_eq!(PATHWAY_STEPS.len(), PATHWAY_NODES.len());
    }

    #[test]
    fn test_listing_numbers_are_one_based() {
        let mut app = App::new(Config::default(), UserProfile::default()).unwrap();
        app.listings = vec![JobListing {
            title: "Analyst".to_string(),
            company: "Acme".to_string(),
            url: "https://acme.example.com/jobs/1".to_string(),
            snippet: String::new(),
            source: "acme.example.com".to_string(),
            location: "Remote".to_string(),
            details: None,
        }];

        assert_eq!(app.listing_number("1"), Some(0));
        assert_eq!(app.listing_number("0"), None);
        assert_eq!(app.listing_number("2"), None);
        assert_eq!(app.listing_number("data analyst"), None);
    }
}
