//! Checking manifest constraints against a package index.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;

use crate::config::RegistryConfig;

use super::error::RegistryError;
use super::requirement::Requirement;
use super::version::Version;
use super::Manifest;

/// A source of published release versions.
#[async_trait]
pub trait PackageIndex: Send + Sync {
    /// All published, non-yanked versions of `name`.
    async fn releases(&self, name: &str) -> Result<Vec<Version>, RegistryError>;
}

/// Client for the PyPI-style JSON API (`<index>/<name>/json`).
pub struct PypiIndex {
    base_url: String,
    client: Client,
}

impl PypiIndex {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.index_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    #[serde(default)]
    yanked: bool,
}

#[async_trait]
impl PackageIndex for PypiIndex {
    async fn releases(&self, name: &str) -> Result<Vec<Version>, RegistryError> {
        let url = format!("{}/{}/json", self.base_url, name);
        tracing::debug!(%url, "registry.lookup");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let project: ProjectResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;

        let mut versions: Vec<Version> = project
            .releases
            .into_iter()
            .filter(|(_, files)| files.is_empty() || files.iter().any(|f| !f.yanked))
            .filter_map(|(raw, _)| Version::parse(&raw).ok())
            .collect();
        versions.sort();

        Ok(versions)
    }
}

/// What the index says about one requirement.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryOutcome {
    /// At least one release satisfies the constraints; `best` is the newest,
    /// preferring final releases.
    Satisfied { best: Version },
    /// The package exists but no release fits.
    NoMatchingRelease { latest: Option<Version> },
    NotFound,
    LookupFailed(String),
}

/// Registry verdict for one manifest line.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryFinding {
    pub line: usize,
    pub name: String,
    pub constraints: String,
    pub outcome: RegistryOutcome,
}

impl RegistryFinding {
    pub fn is_satisfied(&self) -> bool {
        matches!(self.outcome, RegistryOutcome::Satisfied { .. })
    }
}

/// Looks every requirement up on `index`, at most `concurrency` at a time.
///
/// Findings come back in manifest order. Lookup failures are reported per
/// entry instead of aborting the run.
pub async fn check_registry<I: PackageIndex + ?Sized>(
    manifest: &Manifest,
    index: &I,
    concurrency: usize,
) -> Vec<RegistryFinding> {
    let entries: Vec<(usize, &Requirement)> = manifest.numbered_requirements().collect();
    tracing::info!(packages = entries.len(), concurrency, "registry.check.start");

    let findings: Vec<RegistryFinding> = stream::iter(entries)
        .map(|(line, req)| async move {
            let outcome = match index.releases(&req.name).await {
                Ok(releases) => evaluate(req, &releases),
                Err(RegistryError::NotFound(_)) => RegistryOutcome::NotFound,
                Err(e) => RegistryOutcome::LookupFailed(e.to_string()),
            };
            RegistryFinding {
                line,
                name: req.name.clone(),
                constraints: req.constraint_string(),
                outcome,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let unsatisfied = findings.iter().filter(|f| !f.is_satisfied()).count();
    tracing::info!(unsatisfied, "registry.check.done");

    findings
}

fn evaluate(req: &Requirement, releases: &[Version]) -> RegistryOutcome {
    let matching: Vec<&Version> = releases.iter().filter(|v| req.matches(v)).collect();

    let best = matching
        .iter()
        .filter(|v| !v.is_prerelease())
        .max()
        .or_else(|| matching.iter().max())
        .map(|v| (*v).clone());

    match best {
        Some(best) => RegistryOutcome::Satisfied { best },
        None => RegistryOutcome::NoMatchingRelease {
            latest: releases.iter().max().cloned(),
        },
    }
}
