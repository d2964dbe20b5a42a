//! Error types for a roomba run.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the environment profile or its configuration file. Always
/// fatal, raised before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown environment '{0}' (expected development, staging or production)")]
    UnknownEnvironment(String),

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Missing required configuration field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid URL in '{field}': {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("No GitHub token found: set GITHUB_TOKEN or GH_TOKEN, or run 'gh auth login'")]
    MissingToken,
}

/// The GitHub search could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GitHub GraphQL request failed: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("GitHub GraphQL query returned errors: {}", .0.join("; "))]
    Query(Vec<String>),
}

/// An outbound notification failed. The webhook and callback posts fail
/// independently.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to post message to Slack webhook: {0}")]
    Webhook(#[source] reqwest::Error),

    #[error("Failed to post report to callback {url}: {source}")]
    Callback {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Any failure that ends a run after configuration has been loaded.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Send(#[from] SendError),
}
