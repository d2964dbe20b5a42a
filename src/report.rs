use std::{
    collections::{BTreeMap, HashSet},
    sync::LazyLock,
};

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use crate::{
    labels::printable_labels,
    types::{PullRequest, Reminder, ReportEntry, ReportPayload},
};

/// Date format for countdown keys.
pub const COUNTDOWN_DATE_FORMAT: &str = "%Y-%m-%d";

// chrono accepts unpadded fields such as `2024-1-5`; countdown keys must be
// zero-padded.
static COUNTDOWN_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to compile countdown date pattern")
});

fn parse_countdown_date(date: &str) -> Option<NaiveDate> {
    if !COUNTDOWN_DATE.is_match(date) {
        return None;
    }
    NaiveDate::parse_from_str(date, COUNTDOWN_DATE_FORMAT).ok()
}

impl From<&PullRequest> for ReportEntry {
    fn from(pr: &PullRequest) -> Self {
        ReportEntry {
            repository: pr.repository.clone(),
            author: pr.author.clone(),
            updated_at: pr.updated_at,
            labels: printable_labels(&pr.labels),
            title: pr.title.clone(),
            permalink: pr.permalink.clone(),
        }
    }
}

/// Builds the run's report from raw search results.
///
/// Only PRs whose repository is in `allowed_repos` are kept. Entries are
/// ordered oldest update first; entries with equal timestamps keep their
/// input order.
pub fn build_report(
    prs: &[PullRequest],
    allowed_repos: &HashSet<String>,
    channel_id: &str,
    countdown: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> ReportPayload {
    let mut entries: Vec<ReportEntry> = prs
        .iter()
        .filter(|pr| {
            let allowed = allowed_repos.contains(&pr.repository);
            if !allowed {
                debug!(repository = %pr.repository, url = %pr.permalink, "Skipping PR outside allowed repositories");
            }
            allowed
        })
        .map(ReportEntry::from)
        .collect();

    // sort_by_key is stable.
    entries.sort_by_key(|entry| entry.updated_at);

    ReportPayload {
        channel_id: channel_id.to_string(),
        datetime: now,
        prs: entries,
        reminders: active_reminders(countdown, now),
    }
}

/// Returns a reminder for every countdown date at least one whole day after
/// `now`.
///
/// Keys that are not `YYYY-MM-DD` dates are skipped. Reminders follow the
/// map's key order.
pub fn active_reminders(countdown: &BTreeMap<String, String>, now: DateTime<Utc>) -> Vec<Reminder> {
    countdown
        .iter()
        .filter_map(|(date, text)| {
            let Some(date) = parse_countdown_date(date) else {
                debug!(%date, "Ignoring countdown with malformed date");
                return None;
            };
            let date = date.and_hms_opt(0, 0, 0)?.and_utc();
            let days_until = (date - now).num_hours() / 24;

            (days_until > 0).then(|| Reminder {
                date,
                text: format!("Friendly Reminder: \"{text}\" is *{days_until}* days away!"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    fn pr(repository: &str, hours: i64) -> PullRequest {
        PullRequest {
            repository: repository.to_string(),
            author: "bigo".to_string(),
            labels: vec!["ready".to_string()],
            updated_at: now() + Duration::hours(hours),
            permalink: format!("https://github.com/olcolabs/{repository}/pull/{hours}"),
            title: format!("Change in {repository}"),
        }
    }

    fn allowed() -> HashSet<String> {
        ["repo1", "repo2", "repo3"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn countdown(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(date, text)| (date.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn test_build_report_filters_and_orders() {
        let prs = vec![pr("repo1", 3), pr("repo2", 1), pr("repo4", 2), pr("repo3", 2)];
        let report = build_report(&prs, &allowed(), "C1", &BTreeMap::new(), now());

        let repos: Vec<&str> = report.prs.iter().map(|e| e.repository.as_str()).collect();
        assert_eq!(repos, ["repo2", "repo3", "repo1"]);
        assert_eq!(report.channel_id, "C1");
        assert_eq!(report.datetime, now());
        assert!(report.reminders.is_empty());
    }

    #[test]
    fn test_build_report_is_stable_for_equal_timestamps() {
        let mut first = pr("repo1", 2);
        first.title = "first".to_string();
        let mut second = pr("repo1", 2);
        second.title = "second".to_string();
        let prs = vec![pr("repo3", 5), first, pr("repo2", 0), second];

        let report = build_report(&prs, &allowed(), "C1", &BTreeMap::new(), now());
        let titles: Vec<&str> = report.prs.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Change in repo2", "first", "second", "Change in repo3"]);
    }

    #[test]
    fn test_build_report_projects_entries() {
        let mut input = pr("repo1", 0);
        input.labels = vec!["foo".to_string(), "bar".to_string()];
        let report = build_report(&[input.clone()], &allowed(), "C1", &BTreeMap::new(), now());

        assert_eq!(
            report.prs,
            vec![ReportEntry {
                repository: "repo1".to_string(),
                author: "bigo".to_string(),
                updated_at: input.updated_at,
                labels: "foo, bar".to_string(),
                title: input.title,
                permalink: input.permalink,
            }]
        );
    }

    #[test]
    fn test_build_report_excludes_unnamed_repositories() {
        let prs = vec![pr("", 0), pr("repo1", 1)];
        let report = build_report(&prs, &allowed(), "C1", &BTreeMap::new(), now());
        assert_eq!(report.prs.len(), 1);
    }

    #[test]
    fn test_build_report_ignores_labels_for_inclusion() {
        let mut unlabelled = pr("repo1", 0);
        unlabelled.labels.clear();
        let report = build_report(&[unlabelled], &allowed(), "C1", &BTreeMap::new(), now());
        assert_eq!(report.prs.len(), 1);
        assert_eq!(report.prs[0].labels, "");
    }

    #[test]
    fn test_build_report_attaches_reminders() {
        let report = build_report(
            &[],
            &allowed(),
            "C1",
            &countdown(&[("2024-01-20", "Launch")]),
            now(),
        );
        assert!(report.prs.is_empty());
        assert_eq!(report.reminders.len(), 1);
    }

    #[test]
    fn test_active_reminders_boundaries() {
        let reminders = active_reminders(
            &countdown(&[
                ("2024-01-14", "past"),
                ("2024-01-15", "today"),
                ("2024-01-16", "tomorrow"),
            ]),
            now(),
        );
        assert_eq!(reminders.len(), 1);
        assert_eq!(
            reminders[0].text,
            "Friendly Reminder: \"tomorrow\" is *1* days away!"
        );
        assert_eq!(
            reminders[0].date,
            Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_active_reminders_truncates_partial_days() {
        let later = now() + Duration::hours(13);
        let reminders = active_reminders(
            &countdown(&[("2024-01-16", "soon"), ("2024-01-25", "later")]),
            later,
        );
        // 11 hours until the 16th, 9 days 11 hours until the 25th.
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].text.contains("*9*"));
    }

    #[test]
    fn test_parse_countdown_date_requires_padding() {
        assert_eq!(
            parse_countdown_date("2024-01-05"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(parse_countdown_date("2024-1-5"), None);
        assert_eq!(parse_countdown_date("2024-01-5"), None);
        assert_eq!(parse_countdown_date("2024-02-30"), None);
    }

    #[test]
    fn test_active_reminders_skips_malformed_dates() {
        let reminders = active_reminders(
            &countdown(&[
                ("next tuesday", "nope"),
                ("2024-13-01", "bad month"),
                ("2024-1-25", "unpadded"),
                ("2024-01-25 ", "trailing space"),
                (" 2024-01-25", "leading space"),
                ("2039-01-02", "This project should be dead"),
            ]),
            now(),
        );
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].text.contains("This project should be dead"));
    }
}
