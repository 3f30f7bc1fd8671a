use crate::models::{LastChapter, UpdateReport};
use std::collections::HashMap;
use tracing::debug;

/// Latest chapter URL per title URL, as scraped from the updates page.
pub type FreshSnapshot = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated,
    Unchanged,
    /// Neither reported as updated nor as unchanged.
    Unknown,
}

/// Classify one recorded title against the fresh snapshot.
///
/// A title on the updates page counts as updated when its latest chapter
/// differs from the recorded one; the same chapter is *not* reported as
/// unchanged. A title missing from the updates page is unchanged only when
/// nothing was recorded for it either. Every other case is `Unknown`.
pub fn classify(known: &LastChapter, fresh: &FreshSnapshot) -> UpdateStatus {
    match (fresh.get(&known.url), known.chapter_url.as_deref()) {
        (Some(latest), recorded) if recorded != Some(latest.as_str()) => UpdateStatus::Updated,
        (Some(_), _) => UpdateStatus::Unknown,
        (None, None) => UpdateStatus::Unchanged,
        (None, Some(_)) => UpdateStatus::Unknown,
    }
}

pub fn diff_snapshots(known: &[LastChapter], fresh: &FreshSnapshot) -> UpdateReport {
    let mut report = UpdateReport::default();
    for lc in known {
        match classify(lc, fresh) {
            UpdateStatus::Updated => report.updated.push(lc.url.clone()),
            UpdateStatus::Unchanged => report.not_updated.push(lc.url.clone()),
            UpdateStatus::Unknown => debug!("[MANGAHINDISUB UPDATES] no verdict for {}", lc.url),
        }
    }
    report
}
