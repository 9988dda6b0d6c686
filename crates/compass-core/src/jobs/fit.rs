//! Resume-to-job fit analysis and course suggestions.

use serde::{Deserialize, Serialize};

use crate::llm::{json, LLMError, LLM};

use super::prompts;
use super::JobDetails;

const UNPARSED: &str = "Unable to parse LLM response";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFit {
    /// 0-100.
    #[serde(default, deserialize_with = "json::lenient_number")]
    pub match_percentage: Option<f64>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub matching_qualifications: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub missing_qualifications: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub resume_improvement_tips: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub skills_to_develop: Vec<String>,
}

impl JobFit {
    fn fallback() -> Self {
        Self {
            match_percentage: Some(50.0),
            matching_qualifications: vec![UNPARSED.to_string()],
            missing_qualifications: vec![UNPARSED.to_string()],
            resume_improvement_tips: vec![UNPARSED.to_string()],
            skills_to_develop: vec![UNPARSED.to_string()],
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Job Fit\n\n");
        if let Some(pct) = self.match_percentage {
            md.push_str(&format!("**Match:** {:.0}%\n\n", pct.clamp(0.0, 100.0)));
        }

        for (heading, items) in [
            ("Matching Qualifications", &self.matching_qualifications),
            ("Missing Qualifications", &self.missing_qualifications),
            ("Resume Improvement Tips", &self.resume_improvement_tips),
            ("Skills to Develop", &self.skills_to_develop),
        ] {
            md.push_str(&format!("## {}\n\n", heading));
            for item in items {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }

        md
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSuggestion {
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub reason: String,
}

/// Scores `resume` against a job.
pub async fn analyze_job_fit<L: LLM + ?Sized>(
    llm: &L,
    details: &JobDetails,
    resume: &str,
) -> Result<JobFit, LLMError> {
    let prompt = prompts::build_job_fit_prompt(&details.description, &details.requirements, resume);
    tracing::info!(requirements = details.requirements.len(), "jobs.fit");

    let reply = llm.complete(&prompt).await?;
    Ok(json::parse_object_or(&reply, JobFit::fallback))
}

/// One course or certification per skill.
pub async fn suggest_courses<L: LLM + ?Sized>(
    llm: &L,
    skills: &[String],
) -> Result<Vec<CourseSuggestion>, LLMError> {
    if skills.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(skills = skills.len(), "jobs.courses");
    let reply = llm.complete(&prompts::build_course_prompt(skills)).await?;

    Ok(json::parse_array_or(&reply, || {
        vec![CourseSuggestion {
            skill: skills[0].clone(),
            course_name: "Error retrieving course suggestions".to_string(),
            platform: "Multiple platforms available".to_string(),
            reason: "Please try again or search for courses related to these skills online".to_string(),
        }]
    }))
}

/// Renders course suggestions as a markdown table.
pub fn courses_to_markdown(courses: &[CourseSuggestion]) -> String {
    let mut md = String::from("| Skill | Course | Platform | Why |\n|---|---|---|---|\n");
    for c in courses {
        md.push_str(&format!("| {} | {} | {} | {} |\n", c.skill, c.course_name, c.platform, c.reason));
    }
    md
}
