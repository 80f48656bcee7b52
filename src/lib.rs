pub mod config;
pub mod dates;
pub mod fetcher;
pub mod formatter;
pub mod freshness;
pub mod notify;
pub mod runner;
pub mod storage;
pub mod table;
pub mod types;

pub use config::Config;
pub use fetcher::{FeedSource, HttpFeedSource, DEFAULT_FEED_URL};
pub use freshness::FreshnessDecision;
pub use notify::{Notifier, WebhookNotifier};
pub use runner::Runner;
pub use storage::{HttpObjectStore, ObjectStore};
pub use types::*;
