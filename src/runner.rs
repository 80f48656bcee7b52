use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Config;
use crate::dates;
use crate::fetcher::FeedSource;
use crate::freshness::{self, FreshnessDecision};
use crate::notify::Notifier;
use crate::storage::ObjectStore;
use crate::table;
use crate::types::{Result, RunOutcome, RunResult};

/// Base name of the working artifact; uploads are namespaced with a timestamp
/// prefix on top of it.
const OUTPUT_BASE_NAME: &str = "output.csv";

const SUCCESS_SUBJECT: &str = "AWS Feed. New updates available!";
const UPLOAD_FAILURE_SUBJECT: &str = "AWS Feed. Error when uploading file.";

/// One run of the batch pipeline, wired to its collaborators up front so
/// tests can drive it with doubles.
pub struct Runner<'a> {
    config: &'a Config,
    source: &'a dyn FeedSource,
    store: &'a dyn ObjectStore,
    notifier: &'a dyn Notifier,
    work_path: PathBuf,
}

impl<'a> Runner<'a> {
    pub fn new(
        config: &'a Config,
        source: &'a dyn FeedSource,
        store: &'a dyn ObjectStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            source,
            store,
            notifier,
            work_path: std::env::temp_dir().join(OUTPUT_BASE_NAME),
        }
    }

    /// Override the working artifact path. The default is `output.csv` under
    /// the system temp directory.
    pub fn with_work_path(mut self, path: PathBuf) -> Self {
        self.work_path = path;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Drive the full pipeline with the run anchored at `now`: the lookback
    /// threshold and the uploaded object's name both derive from it, so a run
    /// is internally consistent and tests can pin the clock.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunOutcome> {
        let snapshot = self.source.fetch().await?;
        let threshold = dates::threshold_at(now, self.config.days_range);

        if freshness::check_freshness(threshold, &snapshot.updated)? == FreshnessDecision::Skip {
            return Ok(RunOutcome::SkippedStale);
        }

        // A leftover artifact from a previous run at the same path must not
        // leak into this run's upload.
        delete_file(&self.work_path)?;
        let new_entries = table::build_table(&snapshot.entries, threshold, &self.work_path)?;

        let object_name = format!("{}_{}", dates::object_timestamp(&now), OUTPUT_BASE_NAME);

        if let Err(failure) = self
            .store
            .put(&self.work_path, &self.config.bucket_name, &object_name)
            .await
        {
            error!("Upload failed: {}", failure);

            let message = format!(
                "Error occurred while uploading file.\nError code - {}\nError message - {}.",
                failure.code, failure.message
            );
            if let Err(e) = self
                .notifier
                .publish(&self.config.topic_arn, &message, UPLOAD_FAILURE_SUBJECT)
                .await
            {
                error!("Failed to send the upload failure notification: {}", e);
            }

            return Ok(RunOutcome::UploadFailed);
        }

        let message = format!(
            "There are {} new releases.\nCheck out new file at s3://{}/{}",
            new_entries, self.config.bucket_name, object_name
        );
        self.notifier
            .publish(&self.config.topic_arn, &message, SUCCESS_SUBJECT)
            .await?;

        info!(
            "Processing finished: {} new releases uploaded as {}",
            new_entries, object_name
        );
        Ok(RunOutcome::Completed(RunResult {
            status_code: 200,
            body: "Processing completed successfully!".to_string(),
        }))
    }
}

fn delete_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
