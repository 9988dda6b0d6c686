//! Dependency manifest handling.
//!
//! A manifest is a requirements file: one `<name><comparator><version>`
//! declaration per line, with blank lines and `#` comments allowed. One
//! comment usually records the minimum interpreter version, e.g.
//! `# Python >= 3.11`.
//!
//! [`Manifest::parse`] is strict: any declaration that does not fit the
//! grammar is rejected with its line number. [`Manifest::check`] finds
//! semantic problems (conflicting duplicates, impossible ranges) and
//! [`check_registry`] asks a package index whether each constraint can be
//! met by a published release.

mod check;
mod error;
mod registry;
mod requirement;
mod version;

pub use check::{satisfiable, CheckReport, Issue, Severity};
pub use error::{LineErrorKind, ManifestError, RegistryError, VersionError};
pub use registry::{check_registry, PackageIndex, PypiIndex, RegistryFinding, RegistryOutcome};
pub use requirement::{normalize_name, Comparator, Constraint, Requirement};
pub use version::{PreKind, Version};

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::DEFAULT_RUNTIME_NAME;

/// A line of a manifest, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    /// Comment text including the leading `#`.
    Comment(String),
    Requirement(Requirement),
}

/// The interpreter requirement recorded in a comment.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeRequirement {
    /// 1-based line number of the comment.
    pub line: usize,
    pub comparator: Comparator,
    /// Version text as written.
    pub raw: String,
    /// `None` when `raw` is not a valid version identifier.
    pub version: Option<Version>,
}

impl RuntimeRequirement {
    pub fn is_valid(&self) -> bool {
        self.version.is_some()
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub lines: Vec<Line>,
    pub runtime: Option<RuntimeRequirement>,
}

impl Manifest {
    /// Parses manifest text.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let patterns = &*RUNTIME_PATTERNS;
        let mut manifest = Manifest::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                manifest.lines.push(Line::Blank);
                continue;
            }

            if trimmed.starts_with('#') {
                // A trailing runtime comment wins over earlier ones.
                if let Some(runtime) = parse_runtime_comment(patterns, trimmed, line_no) {
                    manifest.runtime = Some(runtime);
                }
                manifest.lines.push(Line::Comment(raw_line.trim_end().to_string()));
                continue;
            }

            let requirement = Requirement::parse(raw_line).map_err(|kind| ManifestError::Line {
                line: line_no,
                content: raw_line.to_string(),
                kind,
            })?;
            manifest.lines.push(Line::Requirement(requirement));
        }

        tracing::debug!(
            lines = manifest.lines.len(),
            requirements = manifest.len(),
            "manifest.parsed"
        );

        Ok(manifest)
    }

    /// Reads and parses a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        Self::parse(&text)
    }

    /// Requirements in file order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.lines.iter().filter_map(|line| match line {
            Line::Requirement(req) => Some(req),
            _ => None,
        })
    }

    /// Requirements paired with their 1-based line numbers.
    pub fn numbered_requirements(&self) -> impl Iterator<Item = (usize, &Requirement)> {
        self.lines.iter().enumerate().filter_map(|(i, line)| match line {
            Line::Requirement(req) => Some((i + 1, req)),
            _ => None,
        })
    }

    /// Ordered `name -> constraints` mapping.
    pub fn constraints(&self) -> Vec<(&str, &[Constraint])> {
        self.requirements()
            .map(|req| (req.name.as_str(), req.constraints.as_slice()))
            .collect()
    }

    /// Looks a requirement up by normalized name.
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        let wanted = normalize_name(name);
        self.requirements().find(|req| req.normalized_name() == wanted)
    }

    pub fn len(&self) -> usize {
        self.requirements().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes only the requirement lines, one per line.
    pub fn to_requirements_string(&self) -> String {
        let mut out = String::new();
        for req in self.requirements() {
            out.push_str(&req.to_string());
            out.push('\n');
        }
        out
    }

    /// Validates the manifest; see [`CheckReport`].
    pub fn check(&self) -> CheckReport {
        check::check(self)
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Manifest::parse(s)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Blank => writeln!(f)?,
                Line::Comment(text) => writeln!(f, "{}", text)?,
                Line::Requirement(req) => writeln!(f, "{}", req)?,
            }
        }
        Ok(())
    }
}

/// Comment patterns naming the runtime with an explicit comparator, or a bare version.
static RUNTIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(runtime_patterns);

fn runtime_patterns() -> Vec<Regex> {
    let name = DEFAULT_RUNTIME_NAME;
    let patterns = [
        format!(r"(?i)\b{name}(?:[ _-]?(?:version|requires))?\s*:?\s*(===|~=|==|!=|<=|>=|<|>)\s*(\S+)"),
        format!(r"(?i)\brequires?[ _-]?{name}\s*:?\s*(===|~=|==|!=|<=|>=|<|>)\s*(\S+)"),
        format!(r"(?i)\b{name}(?:[ _-]?version)?\s*:?\s*()(\d\S*)"),
    ];

    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "manifest.runtime_pattern_invalid");
                None
            }
        })
        .collect()
}

fn parse_runtime_comment(patterns: &[Regex], comment: &str, line: usize) -> Option<RuntimeRequirement> {
    let caps = patterns.iter().find_map(|re| re.captures(comment))?;

    let op = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    let mut raw = caps.get(2)?.as_str().trim_end_matches(['.', ',', ';', ')']).to_string();

    // "3.11+" reads as a minimum.
    let comparator = if op.is_empty() {
        if let Some(stripped) = raw.strip_suffix('+') {
            raw = stripped.to_string();
        }
        Comparator::GreaterEqual
    } else {
        op.parse().unwrap_or(Comparator::GreaterEqual)
    };

    let version = Version::parse(&raw).ok();
    Some(RuntimeRequirement {
        line,
        comparator,
        raw,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_comment_forms() {
        for (text, expected) in [
            "# Python >= 3.11",
            "# requires python>=3.11",
            "# python_requires >= 3.11",
            "# Python version: 3.11+",
        ]
        .iter()
        .map(|t| (*t, "3.11"))
        {
            let manifest = Manifest::parse(text).unwrap();
            let runtime = manifest.runtime.expect(text);
            assert_eq!(runtime.raw, expected, "{text}");
            assert_eq!(runtime.comparator, Comparator::GreaterEqual);
            assert!(runtime.is_valid());
        }
    }

    #[test]
    fn test_unrelated_comments_are_not_runtime() {
        let manifest = Manifest::parse("# python-dotenv loads .env files\npython-dotenv>=1.0.0").unwrap();
        assert!(manifest.runtime.is_none());
    }

    #[test]
    fn test_invalid_runtime_version_is_kept() {
        let manifest = Manifest::parse("# Python >= three").unwrap();
        let runtime = manifest.runtime.unwrap();
        assert_eq!(runtime.raw, "three");
        assert!(!runtime.is_valid());
    }

    #[test]
    fn test_line_numbers_in_errors() {
        let err = Manifest::parse("a>=1\n\nb==oops\n").unwrap_err();
        match err {
            ManifestError::Line { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "b==oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
