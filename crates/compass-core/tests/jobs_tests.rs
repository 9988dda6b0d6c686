mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::ScriptedLLM;
use compass_core::config::{Config, ScraperConfig, NOT_SPECIFIED};
use compass_core::jobs::{analyze_job_fit, courses_to_markdown, suggest_courses};
use compass_core::search::{SearchError, SearchHit};
use compass_core::{DuckDuckGo, JobDetails, JobSearch, WebSearch};
use httpmock::prelude::*;

/// Search engine returning fixed hits and recording each query.
#[derive(Default)]
struct StubSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    fn with_hits(hits: Vec<SearchHit>) -> Arc<Self> {
        Arc::new(Self { hits, ..Self::default() })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, ..Self::default() })
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for StubSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Status(503));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}

fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

fn job_search(search: Arc<StubSearch>) -> JobSearch<Arc<StubSearch>> {
    JobSearch::from_config(search, &Config::default())
}

const JOB_PAGE: &str = r#"<html>
<head><title>Senior Rust Engineer - Acme Corp</title></head>
<body>
  <div class="job-description">
    <p>Build the payments platform at Acme Corp.</p>
    <p>You will own services end to end.</p>
  </div>
  <p>Salary: $120,000 per year</p>
  <p>Employment Type: Full time</p>
  <h2>Requirements</h2>
  <ul>
    <li>5+ years of experience building backend services</li>
    <li>Strong knowledge of async Rust and Tokio</li>
  </ul>
  <h2>Benefits</h2>
  <ul>
    <li>Health insurance for the whole family</li>
    <li>Flexible remote work</li>
  </ul>
  <a class="apply-button" href="/apply/123">Apply now</a>
</body>
</html>"#;

mod listings {
    use super::*;

    #[tokio::test]
    async fn test_search_jobs_builds_listings() {
        let search = StubSearch::with_hits(vec![
            hit(
                "Rust Developer - Acme Corp",
                "https://www.linkedin.com/jobs/view/123",
                "Location: Berlin, Germany. Full time role.",
            ),
            hit("Backend Engineer", "https://jobs.example.org/backend", "Great team"),
        ]);
        let jobs = job_search(Arc::clone(&search));

        let listings = jobs.search_jobs("rust developer", Some("Berlin"), 10).await;

        assert_eq!(search.queries(), vec!["rust developer jobs in Berlin"]);
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].title, "Rust Developer");
        assert_eq!(listings[0].company, "Acme Corp");
        assert_eq!(listings[0].source, "linkedin.com");
        assert_eq!(listings[0].location, "Berlin, Germany");
        assert!(listings[0].details.is_none());

        // No hint in the title or snippet: the requested location applies.
        assert_eq!(listings[1].location, "Berlin");
    }

    #[tokio::test]
    async fn test_search_without_location() {
        let search = StubSearch::with_hits(vec![hit("Nurse", "https://example.com/nurse", "Great team")]);
        let jobs = job_search(Arc::clone(&search));

        let listings = jobs.search_jobs("nurse", Some("  "), 5).await;

        assert_eq!(search.queries(), vec!["nurse jobs"]);
        assert_eq!(listings[0].location, NOT_SPECIFIED);
    }

    #[tokio::test]
    async fn test_search_failure_yields_no_listings() {
        let jobs = job_search(StubSearch::failing());
        assert!(jobs.search_jobs("rust", None, 5).await.is_empty());
    }
}

mod details {
    use super::*;

    #[tokio::test]
    async fn test_job_details_extracts_fields() {
        let server = MockServer::start_async().await;
        let page = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/jobs/senior-rust-engineer")
                    .header_exists("user-agent")
                    .header("referer", "https://www.google.com/");
                then.status(200).header("content-type", "text/html").body(JOB_PAGE);
            })
            .await;

        let search = StubSearch::with_hits(Vec::new());
        let jobs = job_search(Arc::clone(&search));
        let url = server.url("/jobs/senior-rust-engineer");

        let details = jobs.job_details(&url).await;

        page.assert_async().await;
        assert!(!details.placeholder);
        assert!(details.description.contains("Build the payments platform"));
        assert!(details.description.contains("own services end to end"));
        assert_eq!(
            details.requirements,
            vec![
                "5+ years of experience building backend services",
                "Strong knowledge of async Rust and Tokio",
            ]
        );
        assert!(details.salary.contains("$120,000"));
        assert_eq!(details.job_type, "Full time");
        assert!(details
            .benefits
            .contains(&"Health insurance for the whole family".to_string()));
        assert_eq!(details.application_link, server.url("/apply/123"));
        assert!(details.full_text.contains("Requirements"));

        // Description and requirements were found, so no other postings were consulted.
        assert!(search.queries().is_empty());
    }

    #[tokio::test]
    async fn test_rotates_user_agent_after_rejection() {
        let server = MockServer::start_async().await;
        let blocked = server
            .mock_async(|when, then| {
                when.method(GET).path("/jobs/rust").header("user-agent", "agent-one");
                then.status(403);
            })
            .await;
        let allowed = server
            .mock_async(|when, then| {
                when.method(GET).path("/jobs/rust").header("user-agent", "agent-two");
                then.status(200).body(JOB_PAGE);
            })
            .await;

        let scraper = ScraperConfig {
            user_agents: vec!["agent-one".to_string(), "agent-two".to_string()],
            ..ScraperConfig::default()
        };
        let jobs = JobSearch::new(StubSearch::with_hits(Vec::new()), scraper, 3);

        let details = jobs.job_details(&server.url("/jobs/rust")).await;

        blocked.assert_hits_async(1).await;
        allowed.assert_hits_async(1).await;
        assert!(!details.placeholder);
    }

    #[tokio::test]
    async fn test_unreachable_page_gives_placeholder() {
        let server = MockServer::start_async().await;
        let page = server
            .mock_async(|when, then| {
                when.method(GET).path("/careers/data-analyst");
                then.status(500);
            })
            .await;

        let jobs = job_search(StubSearch::with_hits(Vec::new()));
        let url = server.url("/careers/data-analyst");

        let details = jobs.job_details(&url).await;

        // One attempt per configured user agent.
        page.assert_hits_async(Config::default().scraper.user_agents.len()).await;
        assert_eq!(details, JobDetails::unavailable(&url));
        assert!(details.placeholder);
        assert!(details.description.contains("Data Analyst position"));
        assert_eq!(details.application_link, url);
    }

    #[tokio::test]
    async fn test_missing_sections_consult_other_postings() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jobs/data-analyst");
                then.status(200).body(
                    "<html><head><title>Data Analyst - Globex</title></head>\
                     <body><h1>Data Analyst</h1><p>Join our analytics team in Springfield.</p></body></html>",
                );
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/other/data-analyst");
                then.status(200).body(
                    "<html><body><div class=\"description\">Analyze sales data and report weekly.</div>\
                     <h2>Requirements</h2><ul><li>Two years of SQL reporting work</li></ul>\
                     <h2>Benefits</h2><ul><li>Paid time off every quarter</li></ul></body></html>",
                );
            })
            .await;

        let search = StubSearch::with_hits(vec![hit(
            "Data Analyst at Initech",
            &server.url("/other/data-analyst"),
            "",
        )]);
        let jobs = job_search(Arc::clone(&search));

        let details = jobs.job_details(&server.url("/jobs/data-analyst")).await;

        assert_eq!(search.queries(), vec!["Data Analyst job description Globex"]);
        assert_eq!(details.description, "Analyze sales data and report weekly.");
        assert_eq!(details.requirements, vec!["Two years of SQL reporting work"]);
    }

    #[tokio::test]
    async fn test_bare_page_uses_preview_and_generic_requirements() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/jobs/data-analyst");
                then.status(200)
                    .body("<html><body><p>Join our analytics team in Springfield.</p></body></html>");
            })
            .await;

        let jobs = job_search(StubSearch::failing());
        let details = jobs.job_details(&server.url("/jobs/data-analyst")).await;

        assert!(!details.placeholder);
        assert!(details.description.contains("Join our analytics team in Springfield."));
        assert!(details.description.ends_with("..."));
        assert_eq!(
            details.requirements[0],
            "Relevant experience in Data Analyst or related field"
        );
        assert_eq!(details.salary, "Salary not specified");
        assert_eq!(details.job_type, NOT_SPECIFIED);
    }

    #[tokio::test]
    async fn test_load_details_fills_listing_once() {
        let server = MockServer::start_async().await;
        let page = server
            .mock_async(|when, then| {
                when.method(GET).path("/jobs/rust");
                then.status(200).body(JOB_PAGE);
            })
            .await;

        let search = StubSearch::with_hits(vec![hit("Rust - Acme", &server.url("/jobs/rust"), "")]);
        let jobs = job_search(search);
        let mut listings = jobs.search_jobs("rust", None, 1).await;

        jobs.load_details(&mut listings[0]).await;
        jobs.load_details(&mut listings[0]).await;

        page.assert_hits_async(1).await;
        assert!(listings[0].details.is_some());
    }
}

mod duckduckgo {
    use super::*;

    #[tokio::test]
    async fn test_search_parses_results_page() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/html/")
                    .query_param("q", "rust jobs")
                    .header("user-agent", "compass-test");
                then.status(200).body(
                    r#"<div class="result results_links result--ad">
                         <a class="result__a" href="https://ads.example.com">Sponsored</a>
                       </div>
                       <div class="result results_links">
                         <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fjobs.example.com%2Frust&amp;rut=abc">Rust Engineer - Acme</a>
                         <a class="result__snippet">Remote   Rust role.</a>
                       </div>
                       <div class="result results_links">
                         <a class="result__a" href="https://example.org/other">Other</a>
                       </div>"#,
                );
            })
            .await;

        let engine = DuckDuckGo::new(server.url("/html/")).with_user_agent("compass-test");
        let hits = engine.search("rust jobs", 1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust Engineer - Acme");
        assert_eq!(hits[0].url, "https://jobs.example.com/rust");
        assert_eq!(hits[0].snippet, "Remote Rust role.");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/blocked/");
                then.status(403);
            })
            .await;

        let engine = DuckDuckGo::new(server.url("/blocked/"));
        assert!(matches!(
            engine.search("rust", 5).await,
            Err(SearchError::Status(403))
        ));
    }
}

mod fit {
    use super::*;

    fn details() -> JobDetails {
        JobDetails {
            requirements: vec!["Rust".to_string(), "Kubernetes".to_string()],
            description: "Backend role".to_string(),
            ..JobDetails::unavailable("https://example.com/jobs/rust")
        }
    }

    #[tokio::test]
    async fn test_job_fit() {
        let llm = ScriptedLLM::always(
            r#"{"match_percentage": "72%", "matching_qualifications": ["Rust"],
                "missing_qualifications": ["Kubernetes"], "resume_improvement_tips": "Mention clusters",
                "skills_to_develop": ["Kubernetes"]}"#,
        );

        let fit = analyze_job_fit(&llm, &details(), "Rust developer").await.unwrap();

        assert_eq!(fit.match_percentage, Some(72.0));
        assert_eq!(fit.resume_improvement_tips, vec!["Mention clusters"]);
        assert!(llm.prompts()[0].contains("- Kubernetes"));
        assert!(fit.to_markdown().contains("**Match:** 72%"));
    }

    #[tokio::test]
    async fn test_job_fit_fallback() {
        let llm = ScriptedLLM::always("Looks like a good fit!");
        let fit = analyze_job_fit(&llm, &details(), "Rust developer").await.unwrap();

        assert_eq!(fit.match_percentage, Some(50.0));
        assert_eq!(fit.skills_to_develop, vec!["Unable to parse LLM response"]);
    }

    #[tokio::test]
    async fn test_course_suggestions() {
        let llm = ScriptedLLM::always(
            r#"[{"skill": "Kubernetes", "course_name": "CKA Prep", "platform": "Udemy", "reason": "Hands on"}]"#,
        );

        let skills = vec!["Kubernetes".to_string()];
        let courses = suggest_courses(&llm, &skills).await.unwrap();

        assert_eq!(courses[0].course_name, "CKA Prep");
        assert!(courses_to_markdown(&courses).contains("| Kubernetes | CKA Prep | Udemy | Hands on |"));

        let empty = suggest_courses(&llm, &[]).await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(llm.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_course_fallback_names_first_skill() {
        let llm = ScriptedLLM::always("Try some online courses.");
        let skills = vec!["Terraform".to_string(), "Go".to_string()];

        let courses = suggest_courses(&llm, &skills).await.unwrap();

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].skill, "Terraform");
        assert_eq!(courses[0].course_name, "Error retrieving course suggestions");
    }
}
