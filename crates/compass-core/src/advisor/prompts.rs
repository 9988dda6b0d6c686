use crate::profile::UserProfile;

/// Persona shared by every advice request. The user context is appended.
pub const ADVISOR_PERSONA: &str = r#"You are CareerCompass AI, an expert career advisor with extensive knowledge about job markets, career paths, required skills, education requirements, and salary expectations across various industries.

Your goal is to provide accurate, helpful, and tailored career guidance based on the user's questions.

When providing advice:
1. Be specific and actionable
2. Base your answers on current job market trends
3. Consider the user's education level, experience, and interests when relevant
4. Provide balanced perspectives on career options
5. Be encouraging but realistic about requirements and expectations
6. Format your responses with clear headings and bullet points when appropriate

Avoid:
- Giving generic advice that doesn't address the specific question
- Making up statistics or data you're unsure about
- Overwhelming the user with too much information"#;

/// Builds the advisor system prompt for a profile.
pub fn build_advisor_system_prompt(profile: &UserProfile) -> String {
    format!("{ADVISOR_PERSONA}\n\n{}", profile.context_block())
}

pub fn career_overview_question(career: &str) -> String {
    format!(
        "Provide a detailed overview of a career in {career}. Include typical roles, day-to-day responsibilities, and career progression paths."
    )
}

pub fn education_requirements_question(career: &str) -> String {
    format!(
        "What education requirements and certifications are typically needed for a career in {career}? List them in bullet points."
    )
}

pub fn market_outlook_question(industry: &str) -> String {
    format!(
        "Provide a concise analysis of future job market projections for the {industry} industry over the next 5 years. Focus on emerging roles, skills that will be in demand, and potential industry shifts."
    )
}
