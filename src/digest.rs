use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::RunError,
    github::Forge,
    labels::{classify_set, has_actionable_label},
    report::build_report,
    search::open_pull_requests_query,
    slack::Notifier,
    types::{PullRequest, ReportPayload},
};

/// What a single run did.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// The search returned nothing, so nothing was sent.
    NoResults,
    Reported(ReportPayload),
}

fn log_unlabelled(prs: &[PullRequest]) {
    for pr in prs {
        if !has_actionable_label(&classify_set(&pr.labels)) {
            debug!(
                repository = %pr.repository,
                url = %pr.permalink,
                labels = ?pr.labels,
                "PR has no review-status label"
            );
        }
    }
}

/// Searches the organization's open PRs and reports them.
///
/// A search error ends the run before anything is sent. An empty search
/// result ends it silently. The emptiness check sees only results the forge
/// could convert into pull requests, so a page made up entirely of non-PR or
/// incomplete nodes also counts as empty. Otherwise the report is built and
/// handed to `notifier` once, even when no PR survives the allow-list.
pub async fn run_digest<F, N>(
    config: &Config,
    forge: &F,
    notifier: &N,
    now: DateTime<Utc>,
) -> Result<RunOutcome, RunError>
where
    F: Forge + Sync,
    N: Notifier + Sync,
{
    let query = open_pull_requests_query(&config.organization);
    let prs = forge.search_pull_requests(&query).await?;

    if prs.is_empty() {
        info!(%query, "No open pull requests found");
        return Ok(RunOutcome::NoResults);
    }

    log_unlabelled(&prs);

    let report = build_report(
        &prs,
        &config.repos,
        &config.channel_id,
        &config.countdown,
        now,
    );
    debug!(?report, "Built report");

    notifier.report(&report).await?;
    info!(
        prs = report.prs.len(),
        reminders = report.reminders.len(),
        "Report delivered"
    );

    Ok(RunOutcome::Reported(report))
}
