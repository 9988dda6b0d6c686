pub fn build_job_fit_prompt(description: &str, requirements: &[String], resume: &str) -> String {
    let requirements = requirements
        .iter()
        .map(|r| format!("- {r}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert career advisor and job match analyzer. Compare the candidate's resume with the job details below.

JOB DESCRIPTION:
{description}

JOB REQUIREMENTS:
{requirements}

CANDIDATE RESUME:
{resume}

Please analyze how well the candidate's resume matches this job and provide:
1. A match percentage (0-100%)
2. Key matching qualifications the candidate has
3. Important missing qualifications or experience
4. Suggestions for how the candidate could improve their resume for this specific role
5. 3-5 specific skills the candidate should develop to be a stronger match

Format your response as a JSON object with the following keys:
- "match_percentage": a number from 0-100
- "matching_qualifications": a list of strings
- "missing_qualifications": a list of strings
- "resume_improvement_tips": a list of strings
- "skills_to_develop": a list of strings"#
    )
}

pub fn build_course_prompt(skills: &[String]) -> String {
    let skills = skills
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert in career development and education. Based on the skills below that a job candidate needs to develop,
suggest specific courses, certifications, or resources for each skill.

SKILLS TO DEVELOP:
{skills}

For each skill, provide:
1. A specific course, certification, or resource name
2. The platform or provider (e.g., Coursera, Udemy, LinkedIn Learning, etc.)
3. Why this resource is good for developing this skill

Format your response as a JSON array with objects containing:
- "skill": the skill name
- "course_name": name of recommended course/certification
- "platform": where to find the course
- "reason": brief explanation of why this is recommended

Return ONLY a valid JSON response."#
    )
}
