use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review-status category derived from a label's display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelType {
    NeedsOneReview,
    NeedsTwoReviews,
    Ready,
    Wip,
    Unknown,
}

pub type LabelTypeSet = HashSet<LabelType>;

impl LabelType {
    /// Every category that signals a PR's review state.
    pub const ACTIONABLE: [LabelType; 4] = [
        LabelType::NeedsOneReview,
        LabelType::NeedsTwoReviews,
        LabelType::Ready,
        LabelType::Wip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::NeedsOneReview => "NEEDS ONE REVIEW",
            LabelType::NeedsTwoReviews => "NEEDS TWO REVIEWS",
            LabelType::Ready => "READY",
            LabelType::Wip => "WIP",
            LabelType::Unknown => "UNKNOWN",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, LabelType::Unknown)
    }
}

impl fmt::Display for LabelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open pull request as returned by the forge search.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub repository: String,
    pub author: String,
    pub labels: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub permalink: String,
    pub title: String,
}

/// A pull request as it appears in the digest and the callback payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub repository: String,
    pub author: String,
    pub updated_at: DateTime<Utc>,
    pub labels: String,
    pub title: String,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub date: DateTime<Utc>,
    pub text: String,
}

/// Everything one run reports: posted to Slack and to the report callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub channel_id: String,
    pub datetime: DateTime<Utc>,
    pub prs: Vec<ReportEntry>,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    pub data: Option<SearchData>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchData {
    pub search: SearchResults,
}

#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub edges: Vec<SearchEdge>,
}

#[derive(Debug, Deserialize)]
pub struct SearchEdge {
    pub node: Option<GraphQLPullRequest>,
}

// Search results that are not pull requests come back as empty objects, so
// every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLPullRequest {
    pub author: Option<GraphQLAuthor>,
    pub labels: Option<GraphQLLabelConnection>,
    pub head_repository: Option<GraphQLRepository>,
    pub updated_at: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLAuthor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLRepository {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLLabelConnection {
    #[serde(default)]
    pub edges: Vec<GraphQLLabelEdge>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLLabelEdge {
    pub node: GraphQLLabel,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLLabel {
    pub name: String,
}
