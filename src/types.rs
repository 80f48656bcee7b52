use serde::{Deserialize, Serialize};

/// One entry of the vendor changelog feed, as seen by the pipeline.
///
/// Produced by the feed source adapter, consumed once per run, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub id: String,
    pub link: String,
    pub title: String,
    pub summary: String,
    /// RFC-822 timestamp string in the feed's wire format,
    /// e.g. `"Thu, 01 Jun 2023 00:02:00 +0000"`.
    pub published: String,
    /// Category terms in document order.
    pub tags: Vec<String>,
}

/// Feed-level metadata plus entries. One instance per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Feed-level update timestamp, same wire format as entry `published`.
    pub updated: String,
    pub entries: Vec<ChangeEntry>,
}

/// Success descriptor returned to the invoking environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub status_code: u16,
    pub body: String,
}

/// Terminal outcome of one run.
///
/// The three observable outcomes (success, nothing to do, upload failure) are
/// kept as data here; only the binary entrypoint turns them into process exit
/// codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunResult),
    SkippedStale,
    UploadFailed,
}

impl RunOutcome {
    /// Exit code contract consumed by the external scheduler: 0 success,
    /// 123 "ran correctly, found nothing to do", 1 hard failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed(_) => 0,
            RunOutcome::SkippedStale => 123,
            RunOutcome::UploadFailed => 1,
        }
    }
}

/// Failure surfaced by an object store backend, carrying the backend's own
/// error code and message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct StorageError {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed fetch failed: {0}")]
    Fetch(String),

    #[error("feed parse error: {0}")]
    FeedParse(String),

    #[error("{scope} has no {field}")]
    MissingField { scope: String, field: &'static str },

    #[error("invalid timestamp {value:?}: {source}")]
    Format {
        value: String,
        #[source]
        source: chrono::format::ParseError,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
