use super::CareerLevel;

pub const ANALYST_SYSTEM_PROMPT: &str =
    "You are a career path analyst. Reply with JSON only, without commentary.";

pub const SKILLS_SYSTEM_PROMPT: &str =
    "You are a career skills analyst. Reply with JSON only, without commentary.";

pub fn build_level_prompt(career: &str, level: CareerLevel) -> String {
    format!(
        "You are a career path analyst. Given the career path {career}, identify 3-4 common {} positions and their core responsibilities.\nReturn the result as a JSON list with 'title' and 'responsibilities' keys for each position.",
        level.prompt_label()
    )
}

pub fn build_skills_prompt(career: &str) -> String {
    format!(
        "You are a career skills analyst. Given the career path {career}, analyze how skills should develop as one progresses from entry-level to senior positions.\nFocus on technical skills, soft skills, and domain knowledge. Return the result as a JSON object with 'entry', 'mid', and 'senior' keys, each containing a list of skills."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_prompt_names_level() {
        let prompt = build_level_prompt("Nursing", CareerLevel::Mid);
        assert!(prompt.contains("career path Nursing"));
        assert!(prompt.contains("3-4 common mid-level positions"));
    }
}
