//! Resume, learning plan, culture and comparison commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use color_eyre::eyre::{bail, Result};
use compass_core::insights::{
    analyze_resume, company_culture, compare_careers, comparison_to_markdown, create_learning_plan,
    generate_cover_letter, PersonalInfo,
};
use compass_core::Config;

use super::{build_llm, emit_report, read_text, spinner};

#[derive(Debug, Subcommand)]
pub enum ResumeCommand {
    /// Score a resume, optionally against a job description
    Analyze {
        /// Resume as plain text or markdown
        file: PathBuf,

        /// Job description to match against
        #[arg(long)]
        job: Option<PathBuf>,
    },
    /// Write a cover letter for a job
    CoverLetter {
        file: PathBuf,

        #[arg(long)]
        job: PathBuf,

        #[command(flatten)]
        contact: ContactArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ContactArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    #[arg(long)]
    pub portfolio: Option<String>,
}

impl From<ContactArgs> for PersonalInfo {
    fn from(args: ContactArgs) -> Self {
        PersonalInfo {
            name: args.name.unwrap_or_default(),
            email: args.email.unwrap_or_default(),
            phone: args.phone,
            address: args.address,
            linkedin: args.linkedin,
            portfolio: args.portfolio,
        }
    }
}

pub async fn resume(config: &Config, command: ResumeCommand) -> Result<()> {
    let llm = build_llm(config)?;

    match command {
        ResumeCommand::Analyze { file, job } => {
            let resume = read_text(&file)?;
            let job = job.map(|p| read_text(&p)).transpose()?;

            let bar = spinner("Analyzing resume...");
            let analysis = analyze_resume(llm.as_ref(), &resume, job.as_deref()).await;
            bar.finish_and_clear();

            println!("{}", analysis?.to_markdown());
        }
        ResumeCommand::CoverLetter { file, job, contact } => {
            let resume = read_text(&file)?;
            let job = read_text(&job)?;
            if job.trim().is_empty() {
                bail!("the job description is empty");
            }

            let bar = spinner("Writing cover letter...");
            let letter = generate_cover_letter(llm.as_ref(), &resume, &job, &contact.into()).await;
            bar.finish_and_clear();

            println!("{}", letter?);
        }
    }
    Ok(())
}

pub async fn learn(
    config: &Config,
    career: &str,
    skills: &[String],
    experience: Option<&str>,
    save: bool,
) -> Result<()> {
    let llm = build_llm(config)?;
    let experience = experience.unwrap_or("Not specified");

    let bar = spinner(format!("Planning the path to {career}..."));
    let plan = create_learning_plan(llm.as_ref(), skills, career, experience).await;
    bar.finish_and_clear();

    emit_report(config, &format!("Learning Plan: {career}"), &plan?.to_markdown(), save)
}

pub async fn culture(config: &Config, company: &str, save: bool) -> Result<()> {
    let llm = build_llm(config)?;

    let bar = spinner(format!("Looking into {company}..."));
    let culture = company_culture(llm.as_ref(), company).await;
    bar.finish_and_clear();

    emit_report(config, &format!("Company Culture: {company}"), &culture?.to_markdown(), save)
}

pub async fn compare(config: &Config, careers: &[String], save: bool) -> Result<()> {
    if careers.len() < 2 {
        bail!("name at least two careers to compare");
    }
    let llm = build_llm(config)?;

    let bar = spinner("Comparing careers...");
    let comparisons = compare_careers(llm.as_ref(), careers).await;
    bar.finish_and_clear();

    let markdown = comparison_to_markdown(&comparisons?);
    emit_report(config, &format!("Career Comparison: {}", careers.join(" vs ")), &markdown, save)
}
