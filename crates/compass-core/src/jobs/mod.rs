//! Job search and job page scraping.
//!
//! Listings come from a [`WebSearch`] engine. Details are scraped from the
//! listing page; when the page lacks a description or requirements, the
//! top results for `"<title> job description <company>"` are consulted.
//! Every step degrades to placeholder content instead of failing.

pub mod extract;
mod fit;
mod patterns;
mod prompts;

pub use fit::{analyze_job_fit, courses_to_markdown, suggest_courses, CourseSuggestion, JobFit};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use scraper::Html;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ScraperConfig, DEFAULT_USER_AGENTS};
use crate::search::WebSearch;

#[derive(Debug, Error)]
pub enum JobsError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("page returned HTTP {0}")]
    Status(u16),
}

/// A job found through search. `details` is filled on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub url: String,
    pub snippet: String,
    /// Domain the listing is hosted on.
    pub source: String,
    pub location: String,
    pub details: Option<JobDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    pub job_type: String,
    pub benefits: Vec<String>,
    pub application_link: String,
    pub full_text: String,
    /// True when the page could not be fetched and every field is a placeholder.
    pub placeholder: bool,
}

impl JobDetails {
    /// Placeholder details built from the URL alone.
    pub fn unavailable(url: &str) -> Self {
        let job_title = extract::slug_title(url);
        Self {
            description: format!(
                "This is a job listing for a {job_title} position. The original job posting contains more detailed information."
            ),
            requirements: vec![
                format!("Experience with {job_title} or similar roles"),
                "Relevant skills and qualifications".to_string(),
                "Education requirements as specified in the job posting".to_string(),
                "Communication and teamwork skills".to_string(),
            ],
            salary: "Please refer to the original job listing for salary information".to_string(),
            job_type: "Full-time (refer to original listing for confirmation)".to_string(),
            benefits: vec!["Visit the original job listing for complete benefits information".to_string()],
            application_link: url.to_string(),
            full_text: format!(
                "This is a simplified version of the job listing. Please visit the original posting at {url} for complete details."
            ),
            placeholder: true,
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Description\n\n");
        md.push_str(&self.description);
        md.push_str("\n\n");

        md.push_str("## Requirements\n\n");
        for req in &self.requirements {
            md.push_str(&format!("- {}\n", req));
        }
        md.push('\n');

        md.push_str(&format!("**Salary:** {}\n\n", self.salary));
        md.push_str(&format!("**Job type:** {}\n\n", self.job_type));

        if !self.benefits.is_empty() {
            md.push_str("## Benefits\n\n");
            for benefit in &self.benefits {
                md.push_str(&format!("- {}\n", benefit));
            }
            md.push('\n');
        }

        md.push_str(&format!("**Apply:** {}\n", self.application_link));
        md
    }
}

/// Fields that need the parsed document. Parsing stays synchronous so the
/// document never lives across an await.
struct PageFields {
    description: Option<String>,
    title: Option<(String, Option<String>)>,
    application_link: String,
}

impl PageFields {
    fn parse(html: &str, page_url: &str, text: &str) -> Self {
        let document = Html::parse_document(html);
        Self {
            description: extract::find_description(&document, text),
            title: extract::page_title(&document),
            application_link: extract::extract_application_link(&document, page_url),
        }
    }
}

/// Searches for jobs and scrapes their pages.
pub struct JobSearch<W: WebSearch> {
    search: W,
    client: Client,
    scraper: ScraperConfig,
    alternate_results: usize,
}

impl<W: WebSearch> JobSearch<W> {
    pub fn new(search: W, scraper: ScraperConfig, alternate_results: usize) -> Self {
        Self {
            search,
            client: Client::new(),
            scraper,
            alternate_results,
        }
    }

    pub fn from_config(search: W, config: &Config) -> Self {
        Self::new(search, config.scraper.clone(), config.search.alternate_results)
    }

    /// Searches for `"{query} jobs"`, narrowed to `location` when given.
    ///
    /// Search failures are logged and yield no listings.
    pub async fn search_jobs(&self, query: &str, location: Option<&str>, limit: usize) -> Vec<JobListing> {
        let location = location.map(str::trim).filter(|l| !l.is_empty());
        let search_query = match location {
            Some(loc) => format!("{query} jobs in {loc}"),
            None => format!("{query} jobs"),
        };

        tracing::info!(query = %search_query, limit, "jobs.search");
        let hits = match self.search.search(&search_query, limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!(error = %e, "jobs.search.failed");
                return Vec::new();
            }
        };

        hits.into_iter()
            .map(|hit| JobListing {
                title: extract::listing_title(&hit.title),
                company: extract::extract_company(&hit.title),
                source: extract::extract_domain(&hit.url),
                location: extract::extract_location(&hit.title, &hit.snippet, location.unwrap_or("")),
                url: hit.url,
                snippet: hit.snippet,
                details: None,
            })
            .collect()
    }

    /// Scrapes the job page at `url`. Never fails; see [`JobDetails::placeholder`].
    pub async fn job_details(&self, url: &str) -> JobDetails {
        match self.fetch_page(url).await {
            Ok(html) => self.details_from_page(url, &html).await,
            Err(e) => {
                tracing::warn!(%url, error = %e, "jobs.details.unavailable");
                JobDetails::unavailable(url)
            }
        }
    }

    /// Fills `listing.details` in place.
    pub async fn load_details(&self, listing: &mut JobListing) {
        if listing.details.is_none() {
            listing.details = Some(self.job_details(&listing.url).await);
        }
    }

    fn user_agents(&self) -> Vec<&str> {
        if self.scraper.user_agents.is_empty() {
            DEFAULT_USER_AGENTS.to_vec()
        } else {
            self.scraper.user_agents.iter().map(String::as_str).collect()
        }
    }

    fn browser_headers(user_agent: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
        headers.insert("DNT", HeaderValue::from_static("1"));
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers
    }

    /// GETs `url`, trying each user agent in turn until one gets a 200.
    async fn fetch_page(&self, url: &str) -> Result<String, JobsError> {
        let mut last_status = None;

        for (attempt, agent) in self.user_agents().into_iter().enumerate() {
            let response = self
                .client
                .get(url)
                .headers(Self::browser_headers(agent))
                .timeout(self.scraper.timeout())
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::OK {
                tracing::debug!(%url, attempt, "jobs.fetch.ok");
                return Ok(response.text().await?);
            }

            tracing::debug!(%url, attempt, status = status.as_u16(), "jobs.fetch.retry");
            last_status = Some(status);
        }

        Err(JobsError::Status(last_status.map(|s| s.as_u16()).unwrap_or(0)))
    }

    async fn details_from_page(&self, url: &str, html: &str) -> JobDetails {
        let text = extract::page_text(html);
        let page = PageFields::parse(html, url, &text);

        let mut description = page.description;
        let mut requirements = extract::extract_requirements(&text);

        if description.is_none() || requirements.is_empty() {
            if let Some((title, company)) = &page.title {
                self.consult_alternates(title, company.as_deref(), &mut description, &mut requirements)
                    .await;
            }
        }

        let description = description.unwrap_or_else(|| {
            if text.trim().is_empty() {
                format!(
                    "This job listing is for a {} position. The full job details and requirements can be accessed on the original job posting.",
                    extract::slug_title(url)
                )
            } else {
                extract::preview_text(&text, self.scraper.description_preview)
            }
        });

        if requirements.is_empty() {
            requirements = extract::keyword_requirements(&text);
        }
        if requirements.is_empty() {
            requirements = extract::generic_requirements(&extract::slug_title(url));
        }

        JobDetails {
            description,
            requirements,
            salary: extract::extract_salary(&text),
            job_type: extract::extract_job_type(&text),
            benefits: extract::extract_benefits(&text),
            application_link: page.application_link,
            full_text: extract::truncate_chars(&text, self.scraper.full_text_limit),
            placeholder: false,
        }
    }

    /// Looks up other postings of the same job to fill missing fields.
    async fn consult_alternates(
        &self,
        title: &str,
        company: Option<&str>,
        description: &mut Option<String>,
        requirements: &mut Vec<String>,
    ) {
        let query = match company {
            Some(company) => format!("{title} job description {company}"),
            None => format!("{title} job description"),
        };

        let hits = match self.search.search(&query, self.alternate_results).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::debug!(error = %e, "jobs.alternates.search_failed");
                return;
            }
        };

        let agents = self.user_agents();
        let agent = agents.get(2).or_else(|| agents.first()).copied().unwrap_or_default();

        for hit in hits {
            let response = self
                .client
                .get(&hit.url)
                .header(USER_AGENT, agent)
                .timeout(self.scraper.alternate_timeout())
                .send()
                .await;

            let html = match response {
                Ok(resp) if resp.status() == StatusCode::OK => match resp.text().await {
                    Ok(html) => html,
                    Err(_) => continue,
                },
                _ => continue,
            };

            let text = extract::page_text(&html);
            if description.is_none() {
                *description = PageFields::parse(&html, &hit.url, &text).description;
            }
            if requirements.is_empty() {
                *requirements = extract::extract_requirements(&text);
            }

            tracing::debug!(url = %hit.url, "jobs.alternates.consulted");
            if description.is_some() && !requirements.is_empty() {
                break;
            }
        }
    }
}
