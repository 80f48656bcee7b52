use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info};

use crate::dates;
use crate::types::{ChangeEntry, FeedSnapshot, Result, WatchError};

/// Endpoint of the vendor changelog feed.
pub const DEFAULT_FEED_URL: &str = "https://aws.amazon.com/about-aws/whats-new/recent/feed/";

const USER_AGENT: &str = concat!("release-watch/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT_SECONDS: u64 = 30;

/// Source of the changelog feed. The orchestrator only sees this trait, so
/// tests can substitute a canned snapshot.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedSnapshot>;
}

/// HTTP feed source: one GET per run, no conditional requests, no retries.
pub struct HttpFeedSource {
    url: String,
    client: Client,
}

impl HttpFeedSource {
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECONDS))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { url, client }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<FeedSnapshot> {
        debug!("Fetching feed: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::Fetch(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await?;
        info!("Successfully fetched feed: {} ({} bytes)", self.url, body.len());

        parse_snapshot(&body)
    }
}

/// Map a syndication document into the run's view of the feed.
///
/// The feed-level update timestamp and every entry's published timestamp are
/// required; their absence fails the run, consistent with the table builder's
/// no-partial-tolerance policy. Timestamps are carried as wire-format strings
/// so the same date handling covers both fetched and replayed input.
pub fn parse_snapshot(body: &str) -> Result<FeedSnapshot> {
    let feed = parser::parse(body.as_bytes())
        .map_err(|e| WatchError::FeedParse(format!("Failed to parse feed: {}", e)))?;

    let updated = feed
        .updated
        .map(|t| dates::to_feed_timestamp(&t))
        .ok_or(WatchError::MissingField {
            scope: "feed".to_string(),
            field: "updated",
        })?;

    let mut entries = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        entries.push(change_entry(entry)?);
    }

    debug!("Parsed feed with {} entries", entries.len());
    Ok(FeedSnapshot { updated, entries })
}

fn change_entry(entry: feed_rs::model::Entry) -> Result<ChangeEntry> {
    let id = entry.id;

    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .ok_or_else(|| missing(&id, "link"))?;

    let published = entry
        .published
        .map(|t| dates::to_feed_timestamp(&t))
        .ok_or_else(|| missing(&id, "published"))?;

    let title = entry.title.map(|t| t.content).unwrap_or_default();
    let summary = entry.summary.map(|s| s.content).unwrap_or_default();
    let tags = entry.categories.into_iter().map(|c| c.term).collect();

    Ok(ChangeEntry {
        id,
        link,
        title,
        summary,
        published,
        tags,
    })
}

fn missing(entry_id: &str, field: &'static str) -> WatchError {
    WatchError::MissingField {
        scope: format!("entry {}", entry_id),
        field,
    }
}
