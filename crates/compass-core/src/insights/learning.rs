//! Skill-gap learning plans.

use serde::{Deserialize, Serialize};

use crate::llm::{json, LLMError, LLM};

use super::prompts;
use super::resume::push_list;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub description: String,
    /// "Beginner", "Intermediate" or "Advanced".
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub time_commitment: String,
}

impl Course {
    fn new(name: &str, provider: &str, description: &str, difficulty: &str, time_commitment: &str) -> Self {
        Self {
            name: name.to_string(),
            provider: provider.to_string(),
            description: description.to_string(),
            difficulty: difficulty.to_string(),
            time_commitment: time_commitment.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPlan {
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub skill_gaps: Vec<String>,
    #[serde(default)]
    pub recommended_courses: Vec<Course>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub learning_resources: Vec<String>,
    #[serde(default, deserialize_with = "json::string_or_list")]
    pub certification_paths: Vec<String>,
    #[serde(default)]
    pub timeline: String,
}

impl LearningPlan {
    fn fallback() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            skill_gaps: list(&[
                "Technical skill relevant to the field",
                "Industry-specific knowledge",
                "Project management",
            ]),
            recommended_courses: vec![
                Course::new(
                    "Introduction to the Field",
                    "Coursera",
                    "A beginner course covering fundamentals",
                    "Beginner",
                    "4-6 weeks",
                ),
                Course::new(
                    "Advanced Techniques",
                    "Udemy",
                    "More in-depth knowledge and practical skills",
                    "Intermediate",
                    "8-10 weeks",
                ),
            ],
            learning_resources: list(&[
                "Industry standard textbook",
                "Professional association website",
                "Relevant online community",
            ]),
            certification_paths: list(&["Entry-level certification", "Professional certification"]),
            timeline: "6-12 months depending on current experience".to_string(),
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Learning Plan\n\n");
        push_list(&mut md, "Key Skills to Develop", &self.skill_gaps);

        md.push_str("## Recommended Courses\n\n");
        for course in &self.recommended_courses {
            let name = if course.name.is_empty() { "Course" } else { course.name.as_str() };
            md.push_str(&format!("### {}\n\n", name));
            if !course.provider.is_empty() {
                md.push_str(&format!("_{}_\n\n", course.provider));
            }
            if !course.description.is_empty() {
                md.push_str(&format!("{}\n\n", course.description));
            }
            md.push_str(&format!(
                "- Difficulty: {}\n- Time commitment: {}\n\n",
                or_na(&course.difficulty),
                or_na(&course.time_commitment)
            ));
        }

        push_list(&mut md, "Additional Learning Resources", &self.learning_resources);
        push_list(&mut md, "Certification Paths", &self.certification_paths);

        md.push_str("## Suggested Timeline\n\n");
        md.push_str(or_na(&self.timeline));
        md.push('\n');

        md
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Builds a learning plan towards `target_career`.
pub async fn create_learning_plan<L: LLM + ?Sized>(
    llm: &L,
    current_skills: &[String],
    target_career: &str,
    experience: &str,
) -> Result<LearningPlan, LLMError> {
    let prompt = prompts::build_learning_plan_prompt(&current_skills.join(", "), target_career, experience);
    tracing::info!(target_career, skills = current_skills.len(), "insights.learning_plan");

    let reply = llm
        .complete_with_system(prompts::LEARNING_SYSTEM_PROMPT, &prompt)
        .await?;
    Ok(json::parse_object_or(&reply, LearningPlan::fallback))
}
