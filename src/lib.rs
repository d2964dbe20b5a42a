//! Roomba: a digest of open pull requests for Slack.
//!
//! Searches an organization's open pull requests on GitHub, keeps the ones in
//! allow-listed repositories, orders them oldest update first, and posts the
//! digest (with any upcoming countdown reminders) to a Slack incoming
//! webhook. The full report can also be POSTed to a callback URL.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod github;
pub mod graphql;
pub mod labels;
pub mod report;
pub mod search;
pub mod slack;
pub mod types;

pub use cli::{RunSpec, parse_args};
pub use config::{Config, ConfigLoader, Environment};
pub use digest::{RunOutcome, run_digest};
pub use error::{ConfigError, RunError, SendError, TransportError};
pub use github::{Forge, GitHub, get_github_token};
pub use labels::{classify, classify_set, has_actionable_label, printable_labels};
pub use report::{active_reminders, build_report};
pub use slack::{Notifier, SlackNotifier};
pub use types::{LabelType, LabelTypeSet, PullRequest, Reminder, ReportEntry, ReportPayload};
