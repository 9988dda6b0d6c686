//! Side-by-side career comparison.

use serde::{Deserialize, Serialize};

use crate::llm::{json, LLMError, LLM};

use super::prompts;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerComparison {
    #[serde(default)]
    pub career: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub education_required: String,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub skill_requirements: Vec<String>,
    /// 1-10, higher is better.
    #[serde(default, deserialize_with = "json::lenient_number")]
    pub work_life_balance: Option<f64>,
    #[serde(default, deserialize_with = "json::lenient_number")]
    pub job_stability: Option<f64>,
    #[serde(default, deserialize_with = "json::lenient_number")]
    pub growth_potential: Option<f64>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub cons: Vec<String>,
}

impl CareerComparison {
    /// Generic entry used when the model's comparison cannot be parsed.
    pub fn generic(career: &str) -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            career: career.to_string(),
            salary_range: "Varies by location and experience".to_string(),
            education_required: "Typically bachelor's degree or equivalent experience".to_string(),
            skill_requirements: list(&[
                "Communication",
                "Problem solving",
                "Industry knowledge",
                "Technical skills",
                "Teamwork",
            ]),
            work_life_balance: Some(7.0),
            job_stability: Some(6.0),
            growth_potential: Some(7.0),
            pros: list(&[
                "Diverse career paths",
                "Opportunity for growth",
                "Potentially rewarding work",
            ]),
            cons: list(&[
                "Can be competitive",
                "May require ongoing education",
                "Work pressure varies by employer",
            ]),
        }
    }
}

fn rating(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}/10", v as i64),
        Some(v) => format!("{:.1}/10", v),
        None => "N/A".to_string(),
    }
}

/// Renders comparisons as a summary table followed by per-career detail.
pub fn comparison_to_markdown(comparisons: &[CareerComparison]) -> String {
    let mut md = String::new();

    md.push_str("# Career Comparison\n\n");
    md.push_str("| Career | Salary Range | Education | Work-Life Balance | Job Stability | Growth Potential |\n");
    md.push_str("|---|---|---|---|---|---|\n");
    for c in comparisons {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            c.career,
            c.salary_range,
            c.education_required,
            rating(c.work_life_balance),
            rating(c.job_stability),
            rating(c.growth_potential),
        ));
    }
    md.push('\n');

    for c in comparisons {
        md.push_str(&format!("## {}\n\n", c.career));

        md.push_str("**Key Skills:**\n");
        for skill in &c.skill_requirements {
            md.push_str(&format!("- {}\n", skill));
        }
        md.push_str("\n**Pros:**\n");
        for pro in &c.pros {
            md.push_str(&format!("- {}\n", pro));
        }
        md.push_str("\n**Cons:**\n");
        for con in &c.cons {
            md.push_str(&format!("- {}\n", con));
        }
        md.push('\n');
    }

    md
}

/// Compares `careers`. An empty list short-circuits to an empty result
/// without calling the model.
pub async fn compare_careers<L: LLM + ?Sized>(
    llm: &L,
    careers: &[String],
) -> Result<Vec<CareerComparison>, LLMError> {
    if careers.is_empty() {
        return Ok(Vec::new());
    }

    let joined = careers.join(", ");
    tracing::info!(careers = %joined, "insights.compare");

    let reply = llm
        .complete_with_system(prompts::COMPARISON_SYSTEM_PROMPT, &prompts::build_comparison_prompt(&joined))
        .await?;

    Ok(json::parse_array_or(&reply, || {
        careers.iter().map(|c| CareerComparison::generic(c)).collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_ratings() {
        let c = CareerComparison::generic("Nurse");
        assert_eq!(
            (c.work_life_balance, c.job_stability, c.growth_potential),
            (Some(7.0), Some(6.0), Some(7.0))
        );
    }

    #[test]
    fn test_markdown_table_row() {
        let md = comparison_to_markdown(&[CareerComparison::generic("Nurse")]);
        assert!(md.contains("| Nurse | Varies by location and experience | Typically bachelor's degree or equivalent experience | 7/10 | 6/10 | 7/10 |"));
        assert!(md.contains("## Nurse\n\n**Key Skills:**\n- Communication\n"));
    }
}
