//! Slack digest formatting and delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::SendError,
    types::{ReportEntry, ReportPayload},
};

/// Display name for digest messages.
pub const ROOMBA_USER: &str = "Roomba";
pub const ROOMBA_ICON: &str = ":robot_face:";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub text: String,
}

/// Incoming-webhook message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackMessage {
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

/// Delivers a finished report.
#[async_trait]
pub trait Notifier {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SendError>;
}

pub fn header_text(pr_count: usize) -> String {
    format!("Howdy! Here's a list of *{pr_count}* PRs waiting to be reviewed and merged:")
}

/// Renders one digest line; the age is relative to `now`.
pub fn entry_text(entry: &ReportEntry, now: DateTime<Utc>) -> String {
    let age = HumanTime::from(entry.updated_at - now);
    format!(
        "*{}* | {} | {}\n\t [{}] \"<{}|{}>\"",
        entry.repository, entry.author, age, entry.labels, entry.permalink, entry.title
    )
}

/// Header, then one attachment per PR, then one per reminder.
pub fn format_attachments(payload: &ReportPayload, now: DateTime<Utc>) -> Vec<Attachment> {
    std::iter::once(header_text(payload.prs.len()))
        .chain(payload.prs.iter().map(|entry| entry_text(entry, now)))
        .chain(payload.reminders.iter().map(|reminder| reminder.text.clone()))
        .map(|text| Attachment { text })
        .collect()
}

pub struct SlackNotifier {
    webhook_url: String,
    channel_id: String,
    report_callback: Option<String>,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            channel_id: channel_id.into(),
            report_callback: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_report_callback(mut self, url: impl Into<String>) -> Self {
        self.report_callback = Some(url.into()).filter(|url: &String| !url.is_empty());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let notifier = Self::new(&config.web_hook, &config.channel_id);
        match &config.report_callback {
            Some(url) => notifier.with_report_callback(url),
            None => notifier,
        }
    }

    pub fn message(&self, payload: &ReportPayload, now: DateTime<Utc>) -> SlackMessage {
        SlackMessage {
            channel: self.channel_id.clone(),
            username: ROOMBA_USER.to_string(),
            icon_emoji: ROOMBA_ICON.to_string(),
            attachments: format_attachments(payload, now),
        }
    }

    /// Posts the digest to the webhook. Only transport failures are errors;
    /// the response status is logged but not acted on.
    pub async fn send_message(&self, payload: &ReportPayload) -> Result<(), SendError> {
        let message = self.message(payload, Utc::now());

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(SendError::Webhook)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Slack webhook returned a non-success status");
        }
        info!(channel = %self.channel_id, "Message successfully sent to channel");
        Ok(())
    }

    /// Posts the full report to the callback URL, if one is configured.
    pub async fn report_callback(&self, payload: &ReportPayload) -> Result<(), SendError> {
        let Some(url) = &self.report_callback else {
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|source| SendError::Callback {
                url: url.clone(),
                source,
            })?;

        debug!(status = %response.status(), "Report callback responded");
        info!(callback_url = %url, "Report callback sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn report(&self, payload: &ReportPayload) -> Result<(), SendError> {
        self.send_message(payload).await?;
        self.report_callback(payload).await
    }
}
