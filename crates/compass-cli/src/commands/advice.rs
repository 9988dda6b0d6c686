//! Advisor, pathway and self-assessment commands.

use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{bail, Result};
use compass_core::assessment::{find_category, trait_catalog};
use compass_core::pathway::{GraphProgress, PATHWAY_NODES};
use compass_core::profile::{EducationLevel, ExperienceLevel, INTERESTS};
use compass_core::{generate_pathway, match_careers, CareerAdvisor, Config, TraitSelection, UserProfile};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use super::{build_llm, emit_report, spinner};

/// Profile flags shared by the advisor commands.
#[derive(Debug, Clone, Default, Args)]
pub struct ProfileArgs {
    /// Highest education (e.g. "bachelor", "master", "phd")
    #[arg(long)]
    pub education: Option<EducationLevel>,

    /// Years of experience (e.g. "entry", "1-3", "10+")
    #[arg(long)]
    pub experience: Option<ExperienceLevel>,

    /// Area of interest; repeatable
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Career you are considering
    #[arg(long = "career")]
    pub selected_career: Option<String>,
}

impl ProfileArgs {
    pub fn into_profile(self) -> UserProfile {
        for interest in &self.interests {
            if !INTERESTS.iter().any(|known| known.eq_ignore_ascii_case(interest)) {
                tracing::debug!(%interest, "cli.profile.custom_interest");
            }
        }
        UserProfile {
            education: self.education,
            experience: self.experience,
            interests: self.interests,
            selected_career: self.selected_career,
        }
    }
}

/// Trait picks per assessment category.
#[derive(Debug, Clone, Default, Args)]
pub struct MatchArgs {
    #[arg(long = "work-style")]
    pub work_style: Vec<String>,

    #[arg(long = "environment")]
    pub environment: Vec<String>,

    #[arg(long = "communication")]
    pub communication: Vec<String>,

    #[arg(long = "decision")]
    pub decision: Vec<String>,

    #[arg(long = "values")]
    pub values: Vec<String>,
}

impl MatchArgs {
    fn selections(self) -> Result<Vec<TraitSelection>> {
        let picks = [
            ("Work Style", self.work_style),
            ("Work Environment", self.environment),
            ("Communication Style", self.communication),
            ("Decision Making", self.decision),
            ("Values", self.values),
        ];

        let mut selections = Vec::new();
        for (name, traits) in picks {
            if traits.is_empty() {
                continue;
            }
            let Some(category) = find_category(name) else {
                bail!("unknown trait category: {name}");
            };
            let mut resolved = Vec::new();
            for wanted in traits {
                match category.traits.iter().find(|t| t.eq_ignore_ascii_case(&wanted)) {
                    Some(t) => resolved.push(t.to_string()),
                    None => bail!(
                        "unknown {} trait {:?}; choose from: {}",
                        category.name,
                        wanted,
                        category.traits.join(", ")
                    ),
                }
            }
            selections.push(TraitSelection::new(category.name, resolved));
        }
        Ok(selections)
    }
}

pub async fn ask(config: &Config, question: &str, profile: ProfileArgs) -> Result<()> {
    let advisor = CareerAdvisor::new(build_llm(config)?);
    let bar = spinner("Thinking...");
    let reply = advisor.advise(question, &profile.into_profile()).await;
    bar.finish_and_clear();

    println!("{}", reply?);
    Ok(())
}

/// Career overview and education requirements, one after the other.
pub async fn insights(config: &Config, career: &str, profile: ProfileArgs) -> Result<()> {
    let advisor = CareerAdvisor::new(build_llm(config)?);
    let profile = profile.into_profile();

    let bar = spinner(format!("Researching {career}..."));
    let overview = advisor.career_overview(career, &profile).await;
    bar.set_message("Checking education requirements...");
    let education = advisor.education_requirements(career, &profile).await;
    bar.finish_and_clear();

    println!("# {career}\n\n## Overview\n\n{}\n", overview?);
    println!("## Education & Skills\n\n{}", education?);
    Ok(())
}

pub async fn pathway(config: &Config, career: &str, save: bool) -> Result<()> {
    let llm = build_llm(config)?;

    let bar = ProgressBar::new(PATHWAY_NODES.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:20.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let watcher = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    GraphProgress::NodeStarted(node) => bar.set_message(node),
                    GraphProgress::NodeFinished(_) => bar.inc(1),
                    GraphProgress::NodeFailed(node) => bar.abandon_with_message(format!("{node} failed")),
                }
            }
        })
    };

    let result = generate_pathway(career, Arc::clone(&llm), Some(tx)).await;
    let _ = watcher.await;
    bar.finish_and_clear();

    if !result.complete {
        eprintln!("The model could not be reached; showing the short version.");
    }
    emit_report(config, &format!("Career Pathway: {career}"), &result.markdown, save && result.complete)?;

    let links = result.transitions();
    if !links.links.is_empty() {
        println!("\n## Transitions\n");
        for (from, to) in &links.links {
            println!("- {} -> {}", links.labels[*from], links.labels[*to]);
        }
    }
    Ok(())
}

pub fn traits() {
    for category in trait_catalog() {
        println!("{}", category.name);
        for name in category.traits {
            println!("  - {name}");
        }
    }
}

pub fn matches(args: MatchArgs) -> Result<()> {
    let selections = args.selections()?;
    if selections.is_empty() {
        bail!("pick at least one trait; run `compass traits` to see them");
    }

    let results = match_careers(&selections);
    if results.is_empty() {
        println!("No careers matched the selected traits.");
        return Ok(());
    }

    for (rank, m) in results.iter().enumerate() {
        println!("{:>2}. {} ({} matching)", rank + 1, m.career, m.match_strength);
        println!("    {}", m.reasons.join(", "));
    }
    Ok(())
}
