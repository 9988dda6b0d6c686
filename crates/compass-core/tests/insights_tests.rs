mod common;

use common::ScriptedLLM;
use compass_core::insights::{
    analyze_resume, company_culture, compare_careers, comparison_to_markdown, create_learning_plan,
    generate_cover_letter, PersonalInfo, SYNTHESIZED_NOTE,
};
use compass_core::LLMError;

const RESUME: &str = "Jane Doe\nData analyst, 3 years of SQL and Python.";

mod resume {
    use super::*;

    #[tokio::test]
    async fn test_targeted_analysis_parses_reply() {
        let llm = ScriptedLLM::always(
            r#"```json
{"score": "8/10", "strengths": ["SQL"], "weaknesses": "No cloud experience",
 "suggestions": ["Mention dashboards"], "keyword_matches": ["Python", "SQL"]}
```"#,
        );

        let analysis = analyze_resume(&llm, RESUME, Some("Senior analyst, SQL, AWS")).await.unwrap();

        assert_eq!(analysis.score, Some(8.0));
        assert_eq!(analysis.weaknesses, vec!["No cloud experience"]);
        assert!(llm.prompts()[0].contains("Senior analyst, SQL, AWS"));
        assert!(analysis.to_markdown().contains("**Match Score:** 8/10"));
    }

    #[tokio::test]
    async fn test_blank_job_description_means_general_feedback() {
        let llm = ScriptedLLM::always(r#"{"score": 9, "strengths": ["Clear"], "best_career_matches": ["Data Engineer"]}"#);

        let analysis = analyze_resume(&llm, RESUME, Some("   ")).await.unwrap();

        assert_eq!(analysis.score, None);
        assert_eq!(analysis.best_career_matches, vec!["Data Engineer"]);
    }

    #[tokio::test]
    async fn test_unparseable_reply_uses_fallback() {
        let llm = ScriptedLLM::always("Your resume looks great!");

        let targeted = analyze_resume(&llm, RESUME, Some("Analyst")).await.unwrap();
        assert_eq!(targeted.score, Some(5.0));
        assert!(targeted.suggestions.contains(&"Quantify achievements".to_string()));

        let general = analyze_resume(&llm, RESUME, None).await.unwrap();
        assert_eq!(general.best_career_matches, vec!["Based on resume content"]);
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let llm = ScriptedLLM::offline();
        assert!(matches!(
            analyze_resume(&llm, RESUME, None).await,
            Err(LLMError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_cover_letter_includes_contact_block() {
        let llm = ScriptedLLM::always("Dear Hiring Manager,");
        let info = PersonalInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            portfolio: Some("jane.dev".to_string()),
            ..PersonalInfo::default()
        };

        let letter = generate_cover_letter(&llm, RESUME, "Analyst at Acme", &info).await.unwrap();

        assert_eq!(letter, "Dear Hiring Manager,");
        let prompt = &llm.prompts()[0];
        assert!(prompt.contains("Name: Jane Doe\nEmail: jane@example.com\nPortfolio: jane.dev"));
        assert!(prompt.contains("Analyst at Acme"));
    }
}

mod learning {
    use super::*;

    #[tokio::test]
    async fn test_learning_plan() {
        let llm = ScriptedLLM::always(
            r#"Sure! {"skill_gaps": ["Statistics"],
               "recommended_courses": [{"name": "Stats 101", "provider": "edX", "difficulty": "Beginner"}],
               "learning_resources": "Khan Academy", "timeline": "6 months"}"#,
        );

        let skills = vec!["Excel".to_string(), "SQL".to_string()];
        let plan = create_learning_plan(&llm, &skills, "Data Science", "2 years").await.unwrap();

        assert_eq!(plan.skill_gaps, vec!["Statistics"]);
        assert_eq!(plan.recommended_courses[0].provider, "edX");
        assert_eq!(plan.learning_resources, vec!["Khan Academy"]);
        assert!(llm.prompts()[0].contains("Excel, SQL"));
    }

    #[tokio::test]
    async fn test_learning_plan_fallback() {
        let llm = ScriptedLLM::always("no json here");
        let plan = create_learning_plan(&llm, &[], "Nursing", "none").await.unwrap();

        assert_eq!(plan.recommended_courses.len(), 2);
        assert_eq!(plan.timeline, "6-12 months depending on current experience");
    }
}

mod culture {
    use super::*;

    #[tokio::test]
    async fn test_specific_overview_is_annotated() {
        let llm = ScriptedLLM::always(
            r#"{"company": "ignored", "overview": "Acme is a fast-paced rocket maker.", "values": ["Speed"]}"#,
        );

        let culture = company_culture(&llm, "Acme").await.unwrap();

        assert_eq!(culture.company, "Acme");
        assert!(culture.overview.ends_with(SYNTHESIZED_NOTE));
        assert!(culture.to_markdown().starts_with("# Company Culture: Acme"));
    }

    #[tokio::test]
    async fn test_fallback_overview_is_not_annotated() {
        let llm = ScriptedLLM::always("I don't know that company.");

        let culture = company_culture(&llm, "Globex").await.unwrap();

        assert!(culture.overview.contains("based on general knowledge"));
        assert!(!culture.overview.contains(SYNTHESIZED_NOTE));
        assert_eq!(culture.interview_tips.len(), 4);
    }
}

mod compare {
    use super::*;

    #[tokio::test]
    async fn test_empty_list_skips_model() {
        let llm = ScriptedLLM::offline();
        let comparisons = compare_careers(&llm, &[]).await.unwrap();

        assert!(comparisons.is_empty());
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_comparison_table() {
        let llm = ScriptedLLM::always(
            r#"[{"career": "Nurse", "salary_range": "$60k-$90k", "work_life_balance": "6",
                 "job_stability": 9, "growth_potential": 7.5, "pros": "Meaningful work"},
                {"career": "Teacher", "job_stability": null}]"#,
        );

        let careers = vec!["Nurse".to_string(), "Teacher".to_string()];
        let comparisons = compare_careers(&llm, &careers).await.unwrap();
        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].work_life_balance, Some(6.0));
        assert_eq!(comparisons[1].job_stability, None);

        let md = comparison_to_markdown(&comparisons);
        assert!(md.contains("| Nurse | $60k-$90k |  | 6/10 | 9/10 | 7.5/10 |"));
        assert!(md.contains("| Teacher |  |  | N/A | N/A | N/A |"));
        assert!(md.contains("**Pros:**\n- Meaningful work\n"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_gives_generic_entries() {
        let llm = ScriptedLLM::always("Both are great careers.");
        let careers = vec!["Nurse".to_string(), "Teacher".to_string()];

        let comparisons = compare_careers(&llm, &careers).await.unwrap();

        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[1].career, "Teacher");
        assert_eq!(comparisons[1].job_stability, Some(6.0));
    }
}
