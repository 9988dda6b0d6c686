use std::collections::HashMap;
use std::fmt;

use super::requirement::{Comparator, Constraint};
use super::version::Version;
use super::Manifest;

/// How serious an [`Issue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A semantic problem found in a manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// Same package declared twice with ranges that cannot both hold.
    ConflictingDuplicate { name: String, first_line: usize, line: usize },
    /// Same package declared twice with different but overlapping ranges.
    DivergentDuplicate { name: String, first_line: usize, line: usize },
    /// Same package declared twice with identical constraints.
    RedundantDuplicate { name: String, first_line: usize, line: usize },
    /// A single entry whose constraints exclude every version.
    Unsatisfiable { name: String, line: usize, constraints: String },
    /// A runtime comment whose version does not parse.
    InvalidRuntimeVersion { line: usize, raw: String },
    /// No runtime comment found.
    MissingRuntime,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::ConflictingDuplicate { .. }
            | Issue::Unsatisfiable { .. }
            | Issue::InvalidRuntimeVersion { .. } => Severity::Error,
            Issue::DivergentDuplicate { .. } | Issue::RedundantDuplicate { .. } => Severity::Warning,
            Issue::MissingRuntime => Severity::Info,
        }
    }

    /// Line the issue points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Issue::ConflictingDuplicate { line, .. }
            | Issue::DivergentDuplicate { line, .. }
            | Issue::RedundantDuplicate { line, .. }
            | Issue::Unsatisfiable { line, .. }
            | Issue::InvalidRuntimeVersion { line, .. } => Some(*line),
            Issue::MissingRuntime => None,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::ConflictingDuplicate { name, first_line, .. } => write!(
                f,
                "{name} conflicts with its declaration on line {first_line}"
            ),
            Issue::DivergentDuplicate { name, first_line, .. } => write!(
                f,
                "{name} is declared again with a different range (first on line {first_line})"
            ),
            Issue::RedundantDuplicate { name, first_line, .. } => {
                write!(f, "{name} repeats line {first_line}")
            }
            Issue::Unsatisfiable { name, constraints, .. } => {
                write!(f, "{name}{constraints} excludes every version")
            }
            Issue::InvalidRuntimeVersion { raw, .. } => {
                write!(f, "runtime version {raw:?} is not a valid version identifier")
            }
            Issue::MissingRuntime => write!(f, "no runtime version comment found"),
        }
    }
}

/// Result of [`Manifest::check`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    pub issues: Vec<Issue>,
}

impl CheckReport {
    /// True when nothing of error severity was found.
    pub fn is_ok(&self) -> bool {
        !self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }
}

pub(super) fn check(manifest: &Manifest) -> CheckReport {
    let mut issues = Vec::new();
    let mut seen: HashMap<String, (usize, Vec<Constraint>)> = HashMap::new();

    for (line, req) in manifest.numbered_requirements() {
        if !satisfiable(&req.constraints) {
            issues.push(Issue::Unsatisfiable {
                name: req.name.clone(),
                line,
                constraints: req.constraint_string(),
            });
        }

        let key = req.normalized_name();
        match seen.get(&key) {
            None => {
                seen.insert(key, (line, req.constraints.clone()));
            }
            Some((first_line, first)) => {
                let name = req.name.clone();
                let first_line = *first_line;

                if same_constraints(first, &req.constraints) {
                    issues.push(Issue::RedundantDuplicate { name, first_line, line });
                } else {
                    let combined: Vec<Constraint> =
                        first.iter().chain(req.constraints.iter()).cloned().collect();
                    if satisfiable(&combined) {
                        issues.push(Issue::DivergentDuplicate { name, first_line, line });
                    } else {
                        issues.push(Issue::ConflictingDuplicate { name, first_line, line });
                    }
                }
            }
        }
    }

    match &manifest.runtime {
        Some(runtime) if !runtime.is_valid() => issues.push(Issue::InvalidRuntimeVersion {
            line: runtime.line,
            raw: runtime.raw.clone(),
        }),
        Some(_) => {}
        None => issues.push(Issue::MissingRuntime),
    }

    CheckReport { issues }
}

fn same_constraints(a: &[Constraint], b: &[Constraint]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c)) && b.iter().all(|c| a.contains(c))
}

/// Whether some version satisfies every constraint.
///
/// Versions are dense, so a range with distinct endpoints always holds a
/// version. Only pins and single-point ranges need the exclusions checked.
pub fn satisfiable(constraints: &[Constraint]) -> bool {
    let mut lower: Option<(Version, bool)> = None;
    let mut upper: Option<(Version, bool)> = None;
    let mut pins: Vec<Version> = Vec::new();

    for c in constraints {
        match (c.comparator, c.wildcard) {
            (Comparator::Equal, true) => {
                tighten_lower(&mut lower, prefix_floor(&c.version), true);
                tighten_upper(&mut upper, prefix_ceiling(&c.version, c.version.release.len()), false);
            }
            (Comparator::Equal, false) | (Comparator::Arbitrary, _) => pins.push(c.version.clone()),
            (Comparator::GreaterEqual, _) => tighten_lower(&mut lower, c.version.clone(), true),
            (Comparator::Greater, _) => tighten_lower(&mut lower, c.version.clone(), false),
            (Comparator::LessEqual, _) => tighten_upper(&mut upper, c.version.clone(), true),
            (Comparator::Less, _) => tighten_upper(&mut upper, c.version.clone(), false),
            (Comparator::Compatible, _) => {
                tighten_lower(&mut lower, c.version.clone(), true);
                let keep = c.version.release.len().saturating_sub(1);
                tighten_upper(&mut upper, prefix_ceiling(&c.version, keep), false);
            }
            (Comparator::NotEqual, _) => {}
        }
    }

    if !pins.is_empty() {
        return pins.iter().any(|pin| constraints.iter().all(|c| c.matches(pin)));
    }

    match (lower, upper) {
        (Some((lo, lo_inclusive)), Some((hi, hi_inclusive))) => {
            if lo < hi {
                true
            } else if lo == hi && lo_inclusive && hi_inclusive {
                constraints.iter().all(|c| c.matches(&lo))
            } else {
                false
            }
        }
        _ => true,
    }
}

fn tighten_lower(bound: &mut Option<(Version, bool)>, version: Version, inclusive: bool) {
    let replace = match bound {
        None => true,
        Some((current, current_inclusive)) => {
            version > *current || (version == *current && *current_inclusive && !inclusive)
        }
    };
    if replace {
        *bound = Some((version, inclusive));
    }
}

fn tighten_upper(bound: &mut Option<(Version, bool)>, version: Version, inclusive: bool) {
    let replace = match bound {
        None => true,
        Some((current, current_inclusive)) => {
            version < *current || (version == *current && *current_inclusive && !inclusive)
        }
    };
    if replace {
        *bound = Some((version, inclusive));
    }
}

/// Lowest version carrying the release prefix (`1.4` → `1.4.dev0`).
fn prefix_floor(version: &Version) -> Version {
    Version {
        dev: Some(0),
        ..Version::new(version.release.clone())
    }
}

/// First version past the first `keep` release segments (`1.4.5`, 2 → `1.5.dev0`).
fn prefix_ceiling(version: &Version, keep: usize) -> Version {
    let mut release: Vec<u64> = version.release.iter().copied().take(keep.max(1)).collect();
    if let Some(last) = release.last_mut() {
        *last += 1;
    }
    Version {
        epoch: version.epoch,
        dev: Some(0),
        ..Version::new(release)
    }
}
