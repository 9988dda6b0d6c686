//! A single dependency declaration: `name[extras]<comparator><version>,... ; marker  # comment`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LineErrorKind;
use super::version::Version;

/// Version comparison operators, longest spelling first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "===")]
    Arbitrary,
    #[serde(rename = "~=")]
    Compatible,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
}

impl Comparator {
    pub const ALL: [Comparator; 8] = [
        Comparator::Arbitrary,
        Comparator::Compatible,
        Comparator::Equal,
        Comparator::NotEqual,
        Comparator::GreaterEqual,
        Comparator::LessEqual,
        Comparator::Greater,
        Comparator::Less,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Arbitrary => "===",
            Comparator::Compatible => "~=",
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::GreaterEqual => ">=",
            Comparator::LessEqual => "<=",
            Comparator::Greater => ">",
            Comparator::Less => "<",
        }
    }
}

impl FromStr for Comparator {
    type Err = LineErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparator::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| LineErrorKind::UnknownComparator(s.to_string()))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(comparator, version)` pair.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub comparator: Comparator,
    pub version: Version,
    /// `==1.4.*` style prefix match.
    pub wildcard: bool,
    /// Version text exactly as written.
    pub raw: String,
}

impl Constraint {
    pub fn new(comparator: Comparator, version: Version) -> Self {
        let raw = version.to_string();
        Self {
            comparator,
            version,
            wildcard: false,
            raw,
        }
    }

    /// Parses `>=1.2`, `== 1.4.*`, `~=2.0` and friends.
    pub fn parse(text: &str) -> Result<Self, LineErrorKind> {
        let text = text.trim();
        let op_len = text
            .find(|c: char| !matches!(c, '<' | '>' | '=' | '!' | '~'))
            .unwrap_or(text.len());
        let (op, version_text) = text.split_at(op_len);

        if op.is_empty() {
            return Err(LineErrorKind::UnknownComparator(String::new()));
        }
        let comparator: Comparator = op.parse()?;

        let raw = version_text.trim().to_string();
        let (base, wildcard) = match raw.strip_suffix(".*") {
            Some(base) => (base, true),
            None => (raw.as_str(), false),
        };

        if wildcard && !matches!(comparator, Comparator::Equal | Comparator::NotEqual) {
            return Err(LineErrorKind::MisplacedWildcard);
        }

        let version = Version::parse(base)?;

        // `~=` needs at least two release segments.
        if comparator == Comparator::Compatible && version.release.len() < 2 {
            return Err(LineErrorKind::InvalidVersion(super::error::VersionError::Invalid(raw)));
        }

        Ok(Self {
            comparator,
            version,
            wildcard,
            raw,
        })
    }

    /// Whether `candidate` satisfies this constraint.
    pub fn matches(&self, candidate: &Version) -> bool {
        let target = &self.version;
        match self.comparator {
            Comparator::Equal if self.wildcard => wildcard_match(candidate, target),
            Comparator::NotEqual if self.wildcard => !wildcard_match(candidate, target),
            Comparator::Equal => equal_ignoring_local(candidate, target),
            Comparator::NotEqual => !equal_ignoring_local(candidate, target),
            Comparator::GreaterEqual => candidate >= target,
            Comparator::LessEqual => candidate.public() <= *target,
            Comparator::Greater => candidate.public() > *target,
            Comparator::Less => candidate < target,
            Comparator::Compatible => {
                let prefix = &target.release[..target.release.len().saturating_sub(1)];
                candidate >= target
                    && candidate.epoch == target.epoch
                    && candidate.release_starts_with(prefix)
            }
            Comparator::Arbitrary => candidate.to_string() == self.raw.to_ascii_lowercase(),
        }
    }
}

fn equal_ignoring_local(candidate: &Version, target: &Version) -> bool {
    if target.local.is_some() {
        candidate == target && candidate.local == target.local
    } else {
        candidate.public() == *target
    }
}

fn wildcard_match(candidate: &Version, target: &Version) -> bool {
    candidate.epoch == target.epoch && candidate.release_starts_with(&target.release)
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.comparator == other.comparator
            && self.wildcard == other.wildcard
            && self.version == other.version
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator, self.raw)
    }
}

/// A manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub constraints: Vec<Constraint>,
    pub marker: Option<String>,
    pub comment: Option<String>,
}

impl Requirement {
    /// Parses one non-blank, non-comment manifest line.
    pub fn parse(line: &str) -> Result<Self, LineErrorKind> {
        let (body, comment) = split_comment(line);
        let (body, marker) = match body.split_once(';') {
            Some((body, marker)) => (body, Some(marker.trim().to_string()).filter(|m| !m.is_empty())),
            None => (body, None),
        };
        let body = body.trim();

        if body.starts_with('-') {
            let option = body.split_whitespace().next().unwrap_or(body);
            return Err(LineErrorKind::UnsupportedOption(option.to_string()));
        }

        let name_len = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
            .unwrap_or(body.len());
        let (name, rest) = body.split_at(name_len);
        if !valid_name(name) {
            let shown = body.split_whitespace().next().unwrap_or(body);
            return Err(LineErrorKind::InvalidName(shown.to_string()));
        }

        let mut rest = rest.trim_start();
        let mut extras = Vec::new();
        if let Some(after_open) = rest.strip_prefix('[') {
            let (list, after) = after_open.split_once(']').ok_or(LineErrorKind::InvalidExtras)?;
            for extra in list.split(',').map(str::trim) {
                if !valid_name(extra) {
                    return Err(LineErrorKind::InvalidExtras);
                }
                extras.push(extra.to_string());
            }
            rest = after.trim_start();
        }

        let rest = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .unwrap_or(rest)
            .trim();

        if rest.is_empty() {
            return Err(LineErrorKind::MissingConstraint(name.to_string()));
        }

        let constraints = rest
            .split(',')
            .map(Constraint::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            extras,
            constraints,
            marker,
            comment,
        })
    }

    /// Case-folded name with `-`, `_` and `.` runs collapsed to `-`.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Whether `candidate` satisfies every constraint.
    pub fn matches(&self, candidate: &Version) -> bool {
        self.constraints.iter().all(|c| c.matches(candidate))
    }

    /// The constraints rendered as `>=1,<2`.
    pub fn constraint_string(&self) -> String {
        self.constraints
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        write!(f, "{}", self.constraint_string())?;
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, "  # {}", comment)?;
        }
        Ok(())
    }
}

/// Case-folded name with `-`, `_` and `.` runs collapsed to `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    out
}

fn valid_name(name: &str) -> bool {
    let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    starts_ok
        && ends_ok
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Splits off a `#` comment that starts the line or follows whitespace.
fn split_comment(line: &str) -> (&str, Option<String>) {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            let comment = line[i + 1..].trim();
            let comment = (!comment.is_empty()).then(|| comment.to_string());
            return (&line[..i], comment);
        }
    }
    (line, None)
}
