use chrono::{DateTime, Utc};
use tracing::info;

use crate::dates;
use crate::types::Result;

/// Outcome of the feed-level freshness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessDecision {
    Proceed,
    Skip,
}

/// Gate the run on the feed-level update time.
///
/// An update at or before the threshold means there is nothing new to
/// process; the orchestrator turns `Skip` into the sentinel "no new work"
/// outcome without touching the artifact or the notification channel.
pub fn check_freshness(threshold: DateTime<Utc>, feed_updated: &str) -> Result<FreshnessDecision> {
    let last_updated = dates::parse_timestamp(feed_updated)?;

    if last_updated > threshold {
        info!("New entries found! Feed was updated on {}", feed_updated);
        Ok(FreshnessDecision::Proceed)
    } else {
        info!(
            "No new entries since {}",
            dates::format_timestamp(&threshold)
        );
        Ok(FreshnessDecision::Skip)
    }
}
