use tracing::debug;

use crate::types::{GraphQLPullRequest, PullRequest, SearchResults};

/// Only the first page is fetched.
pub const SEARCH_PAGE_SIZE: u32 = 30;

pub fn create_graphql_query(search_query: &str) -> serde_json::Value {
    serde_json::json!({
        "query": r#"
            query($query: String!, $first: Int!) {
                search(query: $query, type: ISSUE, first: $first) {
                    edges {
                        node {
                            ... on PullRequest {
                                author {
                                    login
                                }
                                labels(first: 10) {
                                    edges {
                                        node {
                                            name
                                        }
                                    }
                                }
                                headRepository {
                                    name
                                }
                                updatedAt
                                permalink
                                title
                            }
                        }
                    }
                }
            }
        "#,
        "variables": {
            "query": search_query,
            "first": SEARCH_PAGE_SIZE,
        }
    })
}

/// Converts a search node into a [`PullRequest`].
///
/// Returns `None` for nodes that are not pull requests or lack a timestamp
/// or permalink. A missing head repository (deleted fork) yields an empty
/// repository name, which no allow-list matches.
pub fn convert_graphql_pr(node: GraphQLPullRequest) -> Option<PullRequest> {
    let (Some(updated_at), Some(permalink)) = (node.updated_at, node.permalink) else {
        return None;
    };

    Some(PullRequest {
        repository: node
            .head_repository
            .map(|repo| repo.name)
            .unwrap_or_default(),
        author: node
            .author
            .map(|author| author.login)
            .unwrap_or_else(|| "ghost".to_string()),
        labels: node
            .labels
            .map(|labels| labels.edges.into_iter().map(|edge| edge.node.name).collect())
            .unwrap_or_default(),
        updated_at,
        permalink,
        title: node.title.unwrap_or_default(),
    })
}

pub fn convert_search_results(results: SearchResults) -> Vec<PullRequest> {
    results
        .edges
        .into_iter()
        .filter_map(|edge| edge.node)
        .filter_map(|node| {
            let converted = convert_graphql_pr(node);
            if converted.is_none() {
                debug!("Skipping search result that is not a complete pull request");
            }
            converted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::GraphQLResponse;

    #[test]
    fn test_create_graphql_query_variables() {
        let query = create_graphql_query("is:pr is:open user:olcolabs");
        assert_eq!(query["variables"]["query"], "is:pr is:open user:olcolabs");
        assert_eq!(query["variables"]["first"], 30);
        assert!(
            query["query"]
                .as_str()
                .unwrap()
                .contains("search(query: $query, type: ISSUE, first: $first)")
        );
    }

    #[test]
    fn test_convert_search_response() {
        let response: GraphQLResponse = serde_json::from_value(serde_json::json!({
            "data": {
                "search": {
                    "edges": [
                        {
                            "node": {
                                "author": { "login": "bigo" },
                                "labels": {
                                    "edges": [
                                        { "node": { "name": "needs 1 review" } },
                                        { "node": { "name": "bug" } }
                                    ]
                                },
                                "headRepository": { "name": "roomba" },
                                "updatedAt": "2024-01-15T10:00:00Z",
                                "permalink": "https://github.com/olcolabs/roomba/pull/7",
                                "title": "Add countdown"
                            }
                        },
                        { "node": {} },
                        {
                            "node": {
                                "author": null,
                                "labels": { "edges": [] },
                                "headRepository": null,
                                "updatedAt": "2024-01-14T10:00:00Z",
                                "permalink": "https://github.com/olcolabs/gone/pull/1",
                                "title": "Orphan"
                            }
                        }
                    ]
                }
            }
        }))
        .unwrap();

        let prs = convert_search_results(response.data.unwrap().search);
        assert_eq!(prs.len(), 2);
        assert_eq!(
            prs[0],
            PullRequest {
                repository: "roomba".to_string(),
                author: "bigo".to_string(),
                labels: vec!["needs 1 review".to_string(), "bug".to_string()],
                updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
                permalink: "https://github.com/olcolabs/roomba/pull/7".to_string(),
                title: "Add countdown".to_string(),
            }
        );
        assert_eq!(prs[1].repository, "");
        assert_eq!(prs[1].author, "ghost");
    }

    #[test]
    fn test_convert_page_without_pull_requests() {
        let response: GraphQLResponse = serde_json::from_value(serde_json::json!({
            "data": {
                "search": {
                    "edges": [
                        { "node": {} },
                        { "node": null },
                        { "node": { "title": "No timestamp", "permalink": "https://x" } }
                    ]
                }
            }
        }))
        .unwrap();

        assert!(convert_search_results(response.data.unwrap().search).is_empty());
    }

    #[test]
    fn test_graphql_errors_deserialize() {
        let response: GraphQLResponse = serde_json::from_value(serde_json::json!({
            "data": null,
            "errors": [{ "message": "Bad credentials" }]
        }))
        .unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors[0].message, "Bad credentials");
    }
}
