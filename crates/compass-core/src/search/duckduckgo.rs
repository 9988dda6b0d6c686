use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{SearchConfig, DEFAULT_USER_AGENTS};

use super::{SearchError, SearchHit, WebSearch};

/// DuckDuckGo's JavaScript-free HTML endpoint.
pub struct DuckDuckGo {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl DuckDuckGo {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENTS[0].to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            user_agent: DEFAULT_USER_AGENTS[0].to_string(),
            client,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl WebSearch for DuckDuckGo {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let endpoint =
            Url::parse(&self.base_url).map_err(|e| SearchError::InvalidEndpoint(format!("{}: {}", self.base_url, e)))?;

        tracing::debug!(query, max_results, "search.request");
        let response = self
            .client
            .get(endpoint)
            .query(&[("q", query)])
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "search.failed");
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let hits = parse_results(&body, max_results);
        tracing::debug!(hits = hits.len(), "search.done");
        Ok(hits)
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts organic hits from a results page. Ads are skipped.
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let (Some(block), Some(link), Some(snippet)) = (
        selector("div.result"),
        selector("a.result__a"),
        selector(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for result in document.select(&block) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(anchor) = result.select(&link).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        hits.push(SearchHit {
            title: element_text(anchor),
            url: unwrap_redirect(href),
            snippet: result.select(&snippet).next().map(element_text).unwrap_or_default(),
        });
    }

    hits
}

/// Resolves `//duckduckgo.com/l/?uddg=<target>` redirect links to their
/// target. Other links are returned unchanged.
pub(crate) fn unwrap_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(absolute)
}
