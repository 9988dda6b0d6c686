//! Resume feedback and cover letters.

use serde::{Deserialize, Serialize};

use crate::llm::{json, LLMError, LLM};

use super::prompts;

/// Feedback on a resume, optionally measured against a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// Match strength from 1 to 10; only present for targeted analyses.
    #[serde(default, deserialize_with = "json::lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub keyword_matches: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub best_career_matches: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ResumeAnalysis {
    fn targeted_fallback() -> Self {
        Self {
            score: Some(5.0),
            strengths: strings(&["Relevant experience identified", "Some matching skills found"]),
            weaknesses: strings(&["Resume could be better tailored to this specific job"]),
            suggestions: strings(&["Add more keywords from the job description", "Quantify achievements"]),
            keyword_matches: strings(&["Some relevant terms detected"]),
            best_career_matches: Vec::new(),
        }
    }

    fn general_fallback() -> Self {
        Self {
            score: None,
            strengths: strings(&["Experience clearly presented", "Education section well-structured"]),
            weaknesses: strings(&[
                "Could use more quantifiable achievements",
                "Skills section could be expanded",
            ]),
            suggestions: strings(&[
                "Add metrics to achievements",
                "Tailor resume to specific positions",
                "Consider adding a brief summary",
            ]),
            keyword_matches: Vec::new(),
            best_career_matches: strings(&["Based on resume content"]),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Resume Feedback\n\n");

        if let Some(score) = self.score {
            md.push_str(&format!("**Match Score:** {}/10\n\n", format_score(score)));
        }

        push_list(&mut md, "Strengths", &self.strengths);
        push_list(&mut md, "Areas for Improvement", &self.weaknesses);
        push_list(&mut md, "Suggestions", &self.suggestions);

        if !self.keyword_matches.is_empty() {
            md.push_str("## Keyword Matches\n\n");
            md.push_str("These important keywords from the job description were found in your resume:\n\n");
            for keyword in &self.keyword_matches {
                md.push_str(&format!("- {}\n", keyword));
            }
            md.push('\n');
        }

        if !self.best_career_matches.is_empty() {
            push_list(&mut md, "Potential Career Matches", &self.best_career_matches);
        }

        md
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{:.1}", score)
    }
}

pub(super) fn push_list(md: &mut String, heading: &str, items: &[String]) {
    md.push_str(&format!("## {}\n\n", heading));
    for item in items {
        md.push_str(&format!("- {}\n", item));
    }
    md.push('\n');
}

/// Analyzes a resume. With a non-blank `job_description` the analysis is
/// scored against it; otherwise general feedback and career matches are
/// returned.
pub async fn analyze_resume<L: LLM + ?Sized>(
    llm: &L,
    resume: &str,
    job_description: Option<&str>,
) -> Result<ResumeAnalysis, LLMError> {
    let job_description = job_description.map(str::trim).filter(|jd| !jd.is_empty());

    let (prompt, fallback): (String, fn() -> ResumeAnalysis) = match job_description {
        Some(jd) => (
            prompts::build_targeted_resume_prompt(resume, jd),
            ResumeAnalysis::targeted_fallback,
        ),
        None => (
            prompts::build_general_resume_prompt(resume),
            ResumeAnalysis::general_fallback,
        ),
    };

    tracing::info!(targeted = job_description.is_some(), "insights.resume");
    let reply = llm
        .complete_with_system(prompts::RESUME_SYSTEM_PROMPT, &prompt)
        .await?;

    let mut analysis = json::parse_object_or(&reply, fallback);
    if job_description.is_none() {
        analysis.score = None;
    }
    Ok(analysis)
}

/// Contact details placed at the top of a cover letter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
}

impl PersonalInfo {
    /// One `Label: value` line per provided field.
    pub fn to_prompt_block(&self) -> String {
        let fields = [
            ("Name", Some(self.name.as_str())),
            ("Email", Some(self.email.as_str())),
            ("Phone", self.phone.as_deref()),
            ("Address", self.address.as_deref()),
            ("LinkedIn", self.linkedin.as_deref()),
            ("Portfolio", self.portfolio.as_deref()),
        ];

        fields
            .iter()
            .filter_map(|(label, value)| {
                value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{label}: {v}"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Writes a cover letter tailored to `job_description`.
pub async fn generate_cover_letter<L: LLM + ?Sized>(
    llm: &L,
    resume: &str,
    job_description: &str,
    info: &PersonalInfo,
) -> Result<String, LLMError> {
    let prompt = prompts::build_cover_letter_prompt(&info.to_prompt_block(), resume, job_description);
    tracing::info!("insights.cover_letter");
    llm.complete_with_system(prompts::COVER_LETTER_SYSTEM_PROMPT, &prompt)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_info_skips_blank_fields() {
        let info = PersonalInfo {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: Some("  ".into()),
            linkedin: Some("linkedin.com/in/ada".into()),
            ..PersonalInfo::default()
        };
        assert_eq!(
            info.to_prompt_block(),
            "Name: Ada Lovelace\nEmail: ada@example.com\nLinkedIn: linkedin.com/in/ada"
        );
    }

    #[test]
    fn test_markdown_sections() {
        let md = ResumeAnalysis::targeted_fallback().to_markdown();
        assert!(md.contains("**Match Score:** 5/10"));
        assert!(md.contains("## Keyword Matches"));
        assert!(!md.contains("Potential Career Matches"));

        let md = ResumeAnalysis::general_fallback().to_markdown();
        assert!(!md.contains("Match Score"));
        assert!(md.contains("## Potential Career Matches\n\n- Based on resume content\n"));
    }
}
