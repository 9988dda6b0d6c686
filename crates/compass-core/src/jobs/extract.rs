//! Field extraction from search results and job pages.
//!
//! Page extractors work on the markdown rendering of a page (see
//! [`page_text`]) and, where structure helps, on the parsed document.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::config::NOT_SPECIFIED;

use super::patterns::*;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const SALARY_NOT_SPECIFIED: &str = "Salary not specified";

static LOCATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(LOCATION_PATTERNS));
static SALARY_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(SALARY_PATTERNS));
static JOB_TYPE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(JOB_TYPE_PATTERNS));
static DESCRIPTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(DESCRIPTION_PATTERNS));
static REQUIREMENT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(REQUIREMENT_PATTERNS));
static BENEFIT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(BENEFIT_PATTERNS));
static BULLET_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile_all(&[BULLET_PATTERN]).pop());

static JOB_TYPE_KEYWORD_RES: LazyLock<Vec<(&str, Regex)>> =
    LazyLock::new(|| compile_keywords(JOB_TYPE_KEYWORDS, |k| format!(r"(?i)\b{k}\b")));
static BENEFIT_KEYWORD_RES: LazyLock<Vec<(&str, Regex)>> =
    LazyLock::new(|| compile_keywords(BENEFIT_KEYWORDS, |k| format!(r"(?i)\b{k}\b")));
static SKILL_SENTENCE_RES: LazyLock<Vec<(&str, Regex)>> =
    LazyLock::new(|| compile_keywords(SKILL_KEYWORDS, |k| format!(r"(?i){k}[^.]+\.")));
static REQUIREMENT_CLAUSE_RES: LazyLock<Vec<(&str, Regex)>> = LazyLock::new(|| {
    compile_keywords(REQUIREMENT_KEYWORDS, |k| format!(r"(?i)(?:^|\n|\s)({k}[^\.;:]*(?:\.|\n|$))"))
});

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(%pattern, error = %e, "jobs.pattern_invalid");
                None
            }
        })
        .collect()
}

/// One regex per keyword, built from the escaped keyword.
fn compile_keywords(
    keywords: &'static [&'static str],
    template: impl Fn(&str) -> String,
) -> Vec<(&'static str, Regex)> {
    keywords
        .iter()
        .filter_map(|keyword| {
            let pattern = template(&regex::escape(keyword));
            match Regex::new(&pattern) {
                Ok(re) => Some((*keyword, re)),
                Err(e) => {
                    tracing::warn!(%pattern, error = %e, "jobs.pattern_invalid");
                    None
                }
            }
        })
        .collect()
}

/// Capitalizes the first letter of every word, lowercasing the rest.
/// A word starts after any non-letter, so `"full-time"` becomes `"Full-Time"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// Human-readable title derived from the last path segment of `url`.
pub fn slug_title(url: &str) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let slug = trimmed.rsplit('/').find(|s| !s.is_empty()).unwrap_or(trimmed);
    title_case(&slug.replace(['-', '_'], " "))
}

/// The part of a result title before the first `" - "`.
pub fn listing_title(title: &str) -> String {
    title.split(" - ").next().unwrap_or(title).trim().to_string()
}

/// The second `" - "` segment of a result title.
pub fn extract_company(title: &str) -> String {
    title
        .split(" - ")
        .nth(1)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
}

/// Host of `url` without a leading `www.`.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .filter(|u| u.scheme() == "http" || u.scheme() == "https")
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
}

/// Location from the title (`"Role - Company in City"`), then the snippet,
/// then `default_location`.
pub fn extract_location(title: &str, snippet: &str, default_location: &str) -> String {
    let from_title = title
        .split(" - ")
        .nth(1)
        .filter(|part| part.contains(" in "))
        .and_then(|part| part.split(" in ").nth(1))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(location) = from_title {
        return location.to_string();
    }

    for re in LOCATION_RES.iter() {
        if let Some(caps) = re.captures(snippet) {
            let found = caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str().trim());
            if let Some(location) = found.filter(|s| !s.is_empty()) {
                return location.to_string();
            }
            break;
        }
    }

    let default_location = default_location.trim();
    if default_location.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        default_location.to_string()
    }
}

/// The first salary figure or range in `text`.
pub fn extract_salary(text: &str) -> String {
    first_capture(&SALARY_RES, text).unwrap_or_else(|| SALARY_NOT_SPECIFIED.to_string())
}

/// Employment type: an explicit label, a known type word, then keywords.
pub fn extract_job_type(text: &str) -> String {
    if let Some(found) = first_capture(&JOB_TYPE_RES, text) {
        return found;
    }

    for (keyword, re) in JOB_TYPE_KEYWORD_RES.iter() {
        if re.is_match(text) {
            return title_case(keyword);
        }
    }

    NOT_SPECIFIED.to_string()
}

/// Benefits from a benefits section, or benefit keywords found anywhere.
pub fn extract_benefits(text: &str) -> Vec<String> {
    let mut benefits = match first_capture(&BENEFIT_RES, text) {
        Some(section) => section_items(&section, MIN_BENEFIT_LINE),
        None => Vec::new(),
    };

    if benefits.is_empty() {
        for (keyword, re) in BENEFIT_KEYWORD_RES.iter() {
            if re.is_match(text) {
                benefits.push(title_case(keyword));
            }
        }
    }

    dedupe_limit(benefits, MAX_BENEFITS)
}

/// Requirements from a requirements section, or sentences opening with a
/// skill phrase.
pub fn extract_requirements(text: &str) -> Vec<String> {
    let mut requirements = match first_capture(&REQUIREMENT_RES, text) {
        Some(section) => section_items(&section, MIN_REQUIREMENT_LINE),
        None => Vec::new(),
    };

    if requirements.is_empty() {
        for (_, re) in SKILL_SENTENCE_RES.iter() {
            requirements.extend(re.find_iter(text).map(|m| m.as_str().trim().to_string()));
        }
    }

    dedupe_limit(requirements, MAX_REQUIREMENTS)
}

/// Last-resort requirements: any clause starting with a requirement keyword.
pub fn keyword_requirements(text: &str) -> Vec<String> {
    let mut found = Vec::new();

    for (_, re) in REQUIREMENT_CLAUSE_RES.iter() {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let clause = m.as_str().trim();
                if clause.chars().count() > MIN_KEYWORD_REQUIREMENT {
                    found.push(clause.to_string());
                }
            }
        }
    }

    found.truncate(MAX_REQUIREMENTS);
    found
}

/// Generic requirements for a job known only by its title.
pub fn generic_requirements(job_title: &str) -> Vec<String> {
    vec![
        format!("Relevant experience in {job_title} or related field"),
        "Strong communication skills".to_string(),
        "Problem-solving abilities".to_string(),
        "Ability to work effectively in a team".to_string(),
    ]
}

/// Description from known containers, then from a description section.
pub fn find_description(document: &Html, text: &str) -> Option<String> {
    for css in DESCRIPTION_SELECTORS {
        let selector = match Selector::parse(css) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if let Some(element) = document.select(&selector).next() {
            let content = element
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !content.is_empty() {
                return Some(content);
            }
        }
    }

    first_capture(&DESCRIPTION_RES, text).filter(|s| !s.is_empty())
}

/// [`find_description`], falling back to the first `preview` characters of
/// the page text.
pub fn extract_description(document: &Html, text: &str, preview: usize) -> String {
    find_description(document, text).unwrap_or_else(|| preview_text(text, preview))
}

/// The first `limit` characters of `text` followed by `"..."`.
pub fn preview_text(text: &str, limit: usize) -> String {
    format!("{}...", truncate_chars(text, limit))
}

/// Apply link, resolved against `page_url`; the page itself when none.
pub fn extract_application_link(document: &Html, page_url: &str) -> String {
    let mut href = None;

    for css in APPLY_SELECTORS {
        let selector = match Selector::parse(css) {
            Ok(s) => s,
            Err(_) => continue,
        };
        href = document
            .select(&selector)
            .find_map(|el| el.value().attr("href"))
            .filter(|h| !h.trim().is_empty());
        if href.is_some() {
            break;
        }
    }

    if href.is_none() {
        if let Ok(anchors) = Selector::parse("a[href]") {
            href = document
                .select(&anchors)
                .find(|a| a.text().any(|t| t.contains(APPLY_TEXT)))
                .and_then(|a| a.value().attr("href"));
        }
    }

    match href {
        Some(href) => Url::parse(page_url)
            .and_then(|base| base.join(href.trim()))
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.trim().to_string()),
        None => page_url.to_string(),
    }
}

/// Renders a page as markdown, skipping scripts, styles and images.
pub fn page_text(html: &str) -> String {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["head", "script", "style", "noscript", "img"])
        .build();

    match converter.convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::debug!(error = %e, "jobs.markdown_failed");
            let document = Html::parse_document(html);
            document.root_element().text().collect::<Vec<_>>().join(" ")
        }
    }
}

/// The first `"<title>"` of a page, split into job title and company.
pub fn page_title(document: &Html) -> Option<(String, Option<String>)> {
    let selector = Selector::parse("title").ok()?;
    let raw = document.select(&selector).next()?.text().collect::<String>();
    let mut parts = raw.split(" - ").map(str::trim);
    let title = parts.next().filter(|t| !t.is_empty())?.to_string();
    let company = parts.next().filter(|c| !c.is_empty()).map(str::to_string);
    Some((title, company))
}

/// At most `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
}

/// Bullet items of a section, or its lines longer than `min_line`.
fn section_items(section: &str, min_line: usize) -> Vec<String> {
    let bullets: Vec<String> = match BULLET_RE.as_ref() {
        Some(re) => re
            .captures_iter(section)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };

    if !bullets.is_empty() {
        return bullets;
    }

    section
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > min_line)
        .map(str::to_string)
        .collect()
}

fn dedupe_limit(items: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(limit)
        .collect()
}
