use std::env;

use crate::fetcher::DEFAULT_FEED_URL;
use crate::types::{Result, WatchError};

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lookback window in days.
    pub days_range: i64,
    /// Storage destination identifier.
    pub bucket_name: String,
    /// Notification channel identifier.
    pub topic_arn: String,
    /// Base URL of the object-storage HTTP gateway.
    pub storage_endpoint: String,
    /// Notification webhook URL.
    pub notify_webhook_url: String,
    /// Feed endpoint, overridable for testing against a different feed.
    pub feed_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let days_range = require("DAYS_RANGE")?;
        let days_range = days_range.parse::<i64>().map_err(|_| {
            WatchError::Config(format!(
                "DAYS_RANGE should parse to an integer, got {:?}",
                days_range
            ))
        })?;

        Ok(Self {
            days_range,
            bucket_name: require("BUCKET_NAME")?,
            topic_arn: require("TOPIC_ARN")?,
            storage_endpoint: require("STORAGE_ENDPOINT")?,
            notify_webhook_url: require("NOTIFY_WEBHOOK_URL")?,
            feed_url: env::var("FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string()),
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| WatchError::Config(format!("No {} environment variable found", name)))
}
