use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch or decode the catalog search index.
///
/// Always recovered locally: the widget logs it and stays in fallback mode
/// for the rest of the page view.
#[derive(Debug, Error)]
pub enum IndexLoadError {
    #[error("invalid index location `{location}`: {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    #[error("index request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("index request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read index file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed index payload from {origin}: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The approximate matcher refused or failed a single query.
///
/// Scoped to one invocation; the matcher stays usable afterwards.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("query of {len} characters exceeds the matcher limit of {max}")]
    PatternTooLong { len: usize, max: usize },

    #[error("matcher rejected query: {0}")]
    Rejected(String),
}

/// A navigation node that has no resolvable reference path.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("navigation node `{name}` has no resolvable reference path")]
pub struct MalformedNodeError {
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),
}
