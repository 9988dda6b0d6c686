use std::path::PathBuf;
use thiserror::Error;

/// A version string that does not parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VersionError {
    #[error("invalid version identifier: {0:?}")]
    Invalid(String),
}

/// Why a single manifest line was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineErrorKind {
    #[error("invalid package name {0:?}")]
    InvalidName(String),

    #[error("no version constraint for {0:?}")]
    MissingConstraint(String),

    #[error("unrecognized comparator {0:?}")]
    UnknownComparator(String),

    #[error("{0}")]
    InvalidVersion(#[from] VersionError),

    #[error("wildcard versions are only allowed with == and !=")]
    MisplacedWildcard,

    #[error("malformed extras list")]
    InvalidExtras,

    #[error("installer options such as {0:?} are not dependency declarations")]
    UnsupportedOption(String),
}

/// Errors that can occur while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("line {line}: {kind}: {content}")]
    Line {
        line: usize,
        content: String,
        kind: LineErrorKind,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from a package index lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("package not found on index: {0}")]
    NotFound(String),

    #[error("index returned {status} for {name}")]
    Status { name: String, status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse index response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}
