//! Company culture summaries.

use serde::{Deserialize, Serialize};

use crate::llm::{json, LLMError, LLM};

use super::prompts;
use super::resume::push_list;

/// Appended to overviews that do not already admit to being general.
pub const SYNTHESIZED_NOTE: &str =
    " (Note: This information is synthesized from public knowledge and may not represent current conditions.)";

const NOT_AVAILABLE: &str = "Information not available";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyCulture {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub values: Vec<String>,
    #[serde(default)]
    pub work_environment: String,
    #[serde(default)]
    pub work_life_balance: String,
    #[serde(default)]
    pub growth_opportunities: String,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub interview_tips: Vec<String>,
}

impl CompanyCulture {
    fn fallback(company: &str) -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            company: company.to_string(),
            overview: format!(
                "Information about {company} is based on general knowledge and may not be completely accurate."
            ),
            values: list(&["Innovation", "Customer focus", "Integrity", "Teamwork"]),
            work_environment: "Varies by department and location".to_string(),
            work_life_balance: "Depends on team and role".to_string(),
            growth_opportunities: "Various opportunities depending on company size and structure".to_string(),
            interview_tips: list(&[
                "Research the company thoroughly",
                "Prepare examples of relevant experience",
                "Ask thoughtful questions",
                "Follow up after the interview",
            ]),
        }
    }

    /// Marks overviews that present themselves as specific knowledge.
    fn annotate(&mut self) {
        if !self.overview.to_lowercase().contains("based on general") {
            self.overview.push_str(SYNTHESIZED_NOTE);
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Company Culture: {}\n\n", self.company));

        md.push_str("## Company Culture Overview\n\n");
        md.push_str(text_or(&self.overview, "No overview available"));
        md.push_str("\n\n");

        push_list(&mut md, "Core Values", &self.values);

        for (heading, body) in [
            ("Work Environment", &self.work_environment),
            ("Work-Life Balance", &self.work_life_balance),
            ("Growth Opportunities", &self.growth_opportunities),
        ] {
            md.push_str(&format!("## {}\n\n{}\n\n", heading, text_or(body, NOT_AVAILABLE)));
        }

        push_list(&mut md, "Interview Tips", &self.interview_tips);

        md
    }
}

fn text_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Describes the culture at `company`.
pub async fn company_culture<L: LLM + ?Sized>(llm: &L, company: &str) -> Result<CompanyCulture, LLMError> {
    tracing::info!(company, "insights.culture");
    let reply = llm
        .complete_with_system(prompts::CULTURE_SYSTEM_PROMPT, &prompts::build_culture_prompt(company))
        .await?;

    let mut culture = json::parse_object_or(&reply, || CompanyCulture::fallback(company));
    culture.company = company.to_string();
    culture.annotate();
    Ok(culture)
}
