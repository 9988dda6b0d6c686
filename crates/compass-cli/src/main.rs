mod commands;
mod logging;
mod tui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use compass_core::Config;

use commands::advice::{MatchArgs, ProfileArgs};
use commands::insights::ResumeCommand;
use commands::jobs::JobsCommand;
use commands::manifest::ManifestCommand;
use commands::track::TrackCommand;

#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Career guidance, job search and application tracking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the career advisor a question
    Ask {
        #[arg(required = true)]
        question: Vec<String>,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Interactive advisor with pathway and job tabs
    Chat {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Overview and education requirements for a career
    Insights {
        career: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Map the entry, mid and senior stages of a career
    Pathway {
        career: String,

        /// Write the pathway to the reports directory
        #[arg(long)]
        save: bool,
    },
    /// List the personality traits used by `match`
    Traits,
    /// Suggest careers from personality traits
    Match(MatchArgs),
    /// Resume feedback and cover letters
    #[command(subcommand)]
    Resume(ResumeCommand),
    /// Build a learning plan towards a career
    Learn {
        career: String,

        /// A skill you already have; repeatable
        #[arg(long = "skill")]
        skills: Vec<String>,

        #[arg(long)]
        experience: Option<String>,

        #[arg(long)]
        save: bool,
    },
    /// Describe a company's culture
    Culture {
        company: String,

        #[arg(long)]
        save: bool,
    },
    /// Compare two or more careers side by side
    Compare {
        #[arg(required = true)]
        careers: Vec<String>,

        #[arg(long)]
        save: bool,
    },
    /// Find jobs and check how well you fit them
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Track job applications
    #[command(subcommand)]
    Track(TrackCommand),
    /// Validate a requirements manifest
    #[command(subcommand)]
    Manifest(ManifestCommand),
    /// Configuration helpers
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the default configuration as TOML
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Config(ConfigCommand::Init) = cli.command {
        print!("{}", Config::default_config_string());
        return Ok(());
    }

    let config = Config::load()?;
    config.validate()?;

    let interactive = matches!(cli.command, Commands::Chat { .. });
    let log_path = logging::init(&config.logging, interactive)?;
    tracing::debug!(path = %log_path.display(), "cli.start");

    match cli.command {
        Commands::Ask { question, profile } => commands::advice::ask(&config, &question.join(" "), profile).await,
        Commands::Chat { profile } => tui::run(config, profile.into_profile()).await,
        Commands::Insights { career, profile } => commands::advice::insights(&config, &career, profile).await,
        Commands::Pathway { career, save } => commands::advice::pathway(&config, &career, save).await,
        Commands::Traits => {
            commands::advice::traits();
            Ok(())
        }
        Commands::Match(args) => commands::advice::matches(args),
        Commands::Resume(command) => commands::insights::resume(&config, command).await,
        Commands::Learn {
            career,
            skills,
            experience,
            save,
        } => commands::insights::learn(&config, &career, &skills, experience.as_deref(), save).await,
        Commands::Culture { company, save } => commands::insights::culture(&config, &company, save).await,
        Commands::Compare { careers, save } => commands::insights::compare(&config, &careers, save).await,
        Commands::Jobs(command) => commands::jobs::run(&config, command).await,
        Commands::Track(command) => commands::track::run(&config, command),
        Commands::Manifest(command) => commands::manifest::run(&config, command).await,
        Commands::Config(ConfigCommand::Init) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_profile() {
        let cli = Cli::try_parse_from([
            "compass",
            "ask",
            "how",
            "do",
            "I",
            "start?",
            "--education",
            "master",
            "--interest",
            "Healthcare",
            "--interest",
            "Science",
        ])
        .unwrap();

        match cli.command {
            Commands::Ask { question, profile } => {
                assert_eq!(question.join(" "), "how do I start?");
                assert_eq!(profile.interests, vec!["Healthcare", "Science"]);
                assert!(profile.education.is_some());
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_track_update_status() {
        let cli = Cli::try_parse_from(["compass", "track", "update", "ab12", "interview-scheduled"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Track(TrackCommand::Update {
                status: compass_core::ApplicationStatus::InterviewScheduled,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_experience() {
        assert!(Cli::try_parse_from(["compass", "ask", "hi", "--experience", "forever"]).is_err());
    }
}
