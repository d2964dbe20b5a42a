use std::process::Command;

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::debug;

use crate::{
    error::{ConfigError, TransportError},
    graphql::{convert_search_results, create_graphql_query},
    types::{GraphQLResponse, PullRequest},
};

/// Source of open pull requests.
#[async_trait]
pub trait Forge {
    async fn search_pull_requests(&self, query: &str) -> Result<Vec<PullRequest>, TransportError>;
}

pub fn get_github_token() -> Result<String, ConfigError> {
    // Prefer environment variables over gh CLI to avoid subprocess overhead.
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Ok(token);
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|_| ConfigError::MissingToken)?;
    if !output.status.success() {
        return Err(ConfigError::MissingToken);
    }

    String::from_utf8(output.stdout)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::MissingToken)
}

/// GitHub GraphQL search backed by octocrab.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    pub fn with_token(token: String) -> Result<Self, TransportError> {
        let client = Octocrab::builder().personal_token(token).build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn search_pull_requests(&self, query: &str) -> Result<Vec<PullRequest>, TransportError> {
        debug!(%query, "Searching GitHub");
        let response: GraphQLResponse = self.client.graphql(&create_graphql_query(query)).await?;

        if !response.errors.is_empty() {
            return Err(TransportError::Query(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        Ok(response
            .data
            .map(|data| convert_search_results(data.search))
            .unwrap_or_default())
    }
}
