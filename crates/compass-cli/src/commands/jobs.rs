//! Job search, page scraping and resume fit.

use std::path::PathBuf;

use clap::Subcommand;
use color_eyre::eyre::Result;
use compass_core::jobs::{analyze_job_fit, courses_to_markdown, suggest_courses};
use compass_core::{Config, DuckDuckGo, JobSearch};

use super::{build_llm, read_text, spinner};

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// Search the web for job listings
    Search {
        /// Role or keywords, e.g. "data analyst"
        query: String,

        #[arg(long)]
        location: Option<String>,

        /// Defaults to `search.max_results`
        #[arg(long)]
        limit: Option<usize>,

        /// Print listings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Scrape one job page
    Details { url: String },
    /// Score a resume against a job page
    Fit {
        url: String,

        #[arg(long)]
        resume: PathBuf,

        /// Also suggest courses for the missing skills
        #[arg(long)]
        courses: bool,
    },
}

fn job_search(config: &Config) -> Result<JobSearch<DuckDuckGo>> {
    let engine = DuckDuckGo::from_config(&config.search)?;
    Ok(JobSearch::from_config(engine, config))
}

pub async fn run(config: &Config, command: JobsCommand) -> Result<()> {
    match command {
        JobsCommand::Search {
            query,
            location,
            limit,
            json,
        } => {
            let jobs = job_search(config)?;

            let bar = spinner(format!("Searching for {query} jobs..."));
            let limit = limit.unwrap_or(config.search.max_results);
            let listings = jobs.search_jobs(&query, location.as_deref(), limit).await;
            bar.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&listings)?);
                return Ok(());
            }
            if listings.is_empty() {
                println!("No jobs found. Try a broader query or a different location.");
                return Ok(());
            }
            for (i, job) in listings.iter().enumerate() {
                println!("{}. {} at {}", i + 1, job.title, job.company);
                println!("   {} | {}", job.location, job.source);
                println!("   {}", job.url);
            }
        }
        JobsCommand::Details { url } => {
            let jobs = job_search(config)?;

            let bar = spinner("Fetching job page...");
            let details = jobs.job_details(&url).await;
            bar.finish_and_clear();

            if details.placeholder {
                eprintln!("The page could not be fetched; details below are guessed from the URL.");
            }
            println!("{}", details.to_markdown());
        }
        JobsCommand::Fit { url, resume, courses } => {
            let resume = read_text(&resume)?;
            let jobs = job_search(config)?;
            let llm = build_llm(config)?;

            let bar = spinner("Fetching job page...");
            let details = jobs.job_details(&url).await;
            bar.set_message("Comparing against your resume...");
            let fit = analyze_job_fit(llm.as_ref(), &details, &resume).await;
            bar.finish_and_clear();

            let fit = fit?;
            println!("{}", fit.to_markdown());

            if courses && !fit.skills_to_develop.is_empty() {
                let bar = spinner("Finding courses...");
                let suggestions = suggest_courses(llm.as_ref(), &fit.skills_to_develop).await;
                bar.finish_and_clear();
                println!("## Suggested Courses\n\n{}", courses_to_markdown(&suggestions?));
            }
        }
    }
    Ok(())
}
