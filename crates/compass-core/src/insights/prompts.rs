pub const RESUME_SYSTEM_PROMPT: &str =
    "You are an expert resume analyzer that provides detailed, actionable feedback.";

pub const COVER_LETTER_SYSTEM_PROMPT: &str = "You are an expert cover letter writer who creates compelling, tailored content that helps candidates stand out.";

pub const LEARNING_SYSTEM_PROMPT: &str =
    "You are an expert career development advisor who creates practical, tailored learning plans.";

pub const CULTURE_SYSTEM_PROMPT: &str = "You are an expert on company cultures who provides accurate and helpful information about workplaces.";

pub const COMPARISON_SYSTEM_PROMPT: &str = "You are an expert on career comparison who provides balanced, accurate information to help people make career decisions.";

pub fn build_targeted_resume_prompt(resume: &str, job_description: &str) -> String {
    format!(
        r#"As an expert resume analyst, evaluate the following resume against the provided job description.

Resume:
{resume}

Job Description:
{job_description}

Provide your analysis in the following JSON format:
{{
    "score": <number between 1-10 representing match strength>,
    "strengths": [<list of 3-5 resume strengths related to the job>],
    "weaknesses": [<list of 3-5 areas for improvement>],
    "suggestions": [<list of 3-5 specific improvement suggestions>],
    "keyword_matches": [<list of important keywords from job description found in resume>]
}}

Return ONLY the JSON with no other text."#
    )
}

pub fn build_general_resume_prompt(resume: &str) -> String {
    format!(
        r#"As an expert resume analyst, evaluate the following resume and provide general feedback.

Resume:
{resume}

Provide your analysis in the following JSON format:
{{
    "strengths": [<list of 3-5 resume strengths>],
    "weaknesses": [<list of 3-5 areas for improvement>],
    "suggestions": [<list of 3-5 specific improvement suggestions>],
    "best_career_matches": [<list of 3-5 career paths that might match this resume>]
}}

Return ONLY the JSON with no other text."#
    )
}

pub fn build_cover_letter_prompt(personal_info: &str, resume: &str, job_description: &str) -> String {
    format!(
        r#"As an expert career advisor, generate a professional cover letter based on the following information:

Personal Information:
{personal_info}

Resume Highlights:
{resume}

Job Description:
{job_description}

Create a compelling, concise cover letter that highlights the most relevant skills and experiences from the resume that match the job description.
The cover letter should be professionally formatted, include a proper greeting and closing, and be about 250-350 words.
DO NOT make up information not included in the resume. Focus on matching real experiences to job requirements."#
    )
}

pub fn build_learning_plan_prompt(current_skills: &str, target_career: &str, experience: &str) -> String {
    format!(
        r#"As a career development specialist, create a personalized learning plan for someone transitioning to or advancing in the field of {target_career}.

Current Skills: {current_skills}
Current Experience Level: {experience}
Target Career: {target_career}

Provide your learning plan in the following JSON format:
{{
    "skill_gaps": [<list of 3-5 key skills the person needs to develop>],
    "recommended_courses": [
        {{
            "name": <course name>,
            "provider": <provider name, e.g. Coursera, Udemy, etc.>,
            "description": <brief description>,
            "difficulty": <"Beginner", "Intermediate", or "Advanced">,
            "time_commitment": <estimated time to complete>
        }}
        ... (3-5 courses)
    ],
    "learning_resources": [<list of 3-5 books, websites, or other resources>],
    "certification_paths": [<list of relevant certifications if applicable>],
    "timeline": <suggested timeline for completing the learning plan, e.g. "3-6 months">
}}

Return ONLY the JSON with no other text."#
    )
}

pub fn build_culture_prompt(company: &str) -> String {
    format!(
        r#"As a company culture expert, provide information about the culture at {company}.

Provide your analysis in the following JSON format:
{{
    "overview": <brief overview of the company culture>,
    "values": [<list of 3-5 core company values>],
    "work_environment": <description of typical work environment>,
    "work_life_balance": <assessment of work-life balance>,
    "growth_opportunities": <description of career growth opportunities>,
    "interview_tips": [<list of 3-5 tips for interviewing at this company>]
}}

Based on your knowledge, provide the most accurate information about {company}'s culture.
If you do not have specific information about this company, indicate that the information is based on general industry knowledge or similar companies.
Return ONLY the JSON with no other text."#
    )
}

pub fn build_comparison_prompt(careers: &str) -> String {
    format!(
        r#"As a career comparison expert, provide a detailed comparison of the following career paths: {careers}.

For each career, provide information in the following JSON format:
[
    {{
        "career": <career name>,
        "salary_range": <typical salary range>,
        "education_required": <typical education requirements>,
        "skill_requirements": [<list of 5-7 key skills needed>],
        "work_life_balance": <assessment from 1-10, with 10 being excellent>,
        "job_stability": <assessment from 1-10, with 10 being excellent>,
        "growth_potential": <assessment from 1-10, with 10 being excellent>,
        "pros": [<list of 3-4 advantages of this career>],
        "cons": [<list of 3-4 disadvantages or challenges>]
    }},
    ... (one object for each career)
]

Provide fair and balanced comparisons based on current industry knowledge.
Return ONLY the JSON array with no other text."#
    )
}
