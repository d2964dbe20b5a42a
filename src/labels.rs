//! Classification of free-text PR labels into review-status categories.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{LabelType, LabelTypeSet};

// Tested in order: "ready" and "wip" are plain substring matches and must
// come after the more specific review-count patterns.
static PATTERNS: LazyLock<Vec<(Regex, LabelType)>> = LazyLock::new(|| {
    [
        (r"(?i)needs 1 review", LabelType::NeedsOneReview),
        (r"(?i)needs 2 reviews", LabelType::NeedsTwoReviews),
        (r"(?i)ready", LabelType::Ready),
        (r"(?i)wip", LabelType::Wip),
    ]
    .into_iter()
    .map(|(pattern, label_type)| {
        (
            Regex::new(pattern).expect("Failed to compile label pattern"),
            label_type,
        )
    })
    .collect()
});

/// Returns the category of the first pattern `label` matches, or
/// [`LabelType::Unknown`].
pub fn classify(label: &str) -> LabelType {
    PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(label))
        .map_or(LabelType::Unknown, |(_, label_type)| *label_type)
}

pub fn classify_set<I, S>(labels: I) -> LabelTypeSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| classify(label.as_ref()))
        .collect()
}

/// True when the set holds at least one category other than `Unknown`.
pub fn has_actionable_label(set: &LabelTypeSet) -> bool {
    set.iter().any(LabelType::is_actionable)
}

/// Joins non-empty label names with ", ", keeping source order and
/// duplicates.
pub fn printable_labels<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
