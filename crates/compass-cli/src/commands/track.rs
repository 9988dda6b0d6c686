//! Job application tracking.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use color_eyre::eyre::Result;
use compass_core::{Application, ApplicationStatus, ApplicationTracker, Config};

use super::storage;

#[derive(Debug, Subcommand)]
pub enum TrackCommand {
    /// Record a new application
    Add {
        company: String,
        position: String,

        #[arg(long)]
        location: Option<String>,

        /// Date applied (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "applied")]
        status: ApplicationStatus,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
    /// List applications, newest first
    List {
        /// Only show these statuses; repeatable
        #[arg(long)]
        status: Vec<ApplicationStatus>,

        /// Print applications as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change an application's status
    Update {
        /// Application id or a unique prefix of it
        id: String,
        status: ApplicationStatus,
    },
    /// Delete an application
    Remove { id: String },
    /// Counts by status and by month
    Stats,
}

pub fn run(config: &Config, command: TrackCommand) -> Result<()> {
    let mut tracker = ApplicationTracker::new(storage(config));

    match command {
        TrackCommand::Add {
            company,
            position,
            location,
            date,
            status,
            url,
            notes,
        } => {
            let applied_on = date.unwrap_or_else(|| Local::now().date_naive());
            let mut app = Application::new(company, position, applied_on)?.with_status(status);
            if let Some(location) = location {
                app = app.with_location(location);
            }
            if let Some(url) = url {
                app = app.with_url(url);
            }
            if let Some(notes) = notes {
                app = app.with_notes(notes);
            }

            let app = tracker.add(app)?;
            println!("Tracked {} at {} [{}]", app.position, app.company, app.short_id());
        }
        TrackCommand::List { status, json } => {
            let apps = tracker.list(&status)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&apps)?);
                return Ok(());
            }
            if apps.is_empty() {
                println!("No applications tracked yet. Add one with `compass track add`.");
                return Ok(());
            }
            for app in apps {
                let location = if app.location.is_empty() { "-" } else { app.location.as_str() };
                println!(
                    "{}  {}  {:<20}  {:<24}  {:<12}  {}",
                    app.short_id(),
                    app.applied_on,
                    app.status.display_name(),
                    app.company,
                    location,
                    app.position
                );
            }
        }
        TrackCommand::Update { id, status } => {
            let app = tracker.update_status(&id, status)?;
            println!("{} at {} is now {}", app.position, app.company, app.status);
        }
        TrackCommand::Remove { id } => {
            let app = tracker.remove(&id)?;
            println!("Removed {} at {}", app.position, app.company);
        }
        TrackCommand::Stats => {
            let stats = tracker.stats()?;
            println!("Total applications: {}\n", stats.total);
            if stats.total == 0 {
                return Ok(());
            }

            println!("By status:");
            for (status, count) in &stats.by_status {
                println!("  {:<20} {count}", status.display_name());
            }

            println!("\nBy month:");
            for (month, count) in &stats.by_month {
                println!("  {month}  {}", "#".repeat(*count));
            }
        }
    }
    Ok(())
}
