use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use release_watch::{
    ChangeEntry, Config, FeedSnapshot, FeedSource, Notifier, ObjectStore, Result, RunOutcome,
    RunResult, Runner, StorageError, DEFAULT_FEED_URL,
};

struct StaticSource {
    snapshot: FeedSnapshot,
}

#[async_trait]
impl FeedSource for StaticSource {
    async fn fetch(&self) -> Result<FeedSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[derive(Default)]
struct RecordingStore {
    fail_with: Option<StorageError>,
    uploads: Mutex<Vec<(PathBuf, String, String)>>,
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put(
        &self,
        local_path: &Path,
        bucket: &str,
        object_name: &str,
    ) -> std::result::Result<(), StorageError> {
        self.uploads.lock().unwrap().push((
            local_path.to_path_buf(),
            bucket.to_string(),
            object_name.to_string(),
        ));
        match &self.fail_with {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    // (topic, subject, message)
    published: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, topic: &str, message: &str, subject: &str) -> Result<()> {
        self.published.lock().unwrap().push((
            topic.to_string(),
            subject.to_string(),
            message.to_string(),
        ));
        Ok(())
    }
}

fn test_config() -> Config {
    Config {
        days_range: 3,
        bucket_name: "release-archive".to_string(),
        topic_arn: "arn:aws:sns:us-east-1:123456789012:releases".to_string(),
        storage_endpoint: "http://localhost:9000".to_string(),
        notify_webhook_url: "http://localhost:9999/notify".to_string(),
        feed_url: DEFAULT_FEED_URL.to_string(),
    }
}

fn fresh_snapshot() -> FeedSnapshot {
    FeedSnapshot {
        updated: "Mon, 02 Jan 2023 10:00:00 +0000".to_string(),
        entries: vec![ChangeEntry {
            id: "urn:release:lambda-1".to_string(),
            link: "https://aws.amazon.com/about-aws/whats-new/2023/01/lambda/".to_string(),
            title: "Lambda update".to_string(),
            summary: "Lambda now does a thing.".to_string(),
            published: "Wed, 04 Jan 2023 12:00:00 +0000".to_string(),
            tags: vec!["general:products/lambda".to_string()],
        }],
    }
}

// "now" pinned so that the threshold falls on 2023-01-02 00:00:05 UTC.
fn run_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn successful_run_uploads_the_table_and_notifies() {
    let dir = TempDir::new().unwrap();
    let work_path = dir.path().join("output.csv");

    let config = test_config();
    let source = StaticSource {
        snapshot: fresh_snapshot(),
    };
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();

    let outcome = Runner::new(&config, &source, &store, &notifier)
        .with_work_path(work_path.clone())
        .run_at(run_instant())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed(RunResult {
            status_code: 200,
            body: "Processing completed successfully!".to_string(),
        })
    );
    assert_eq!(outcome.exit_code(), 0);

    let contents = std::fs::read_to_string(&work_path).unwrap();
    assert_eq!(
        contents,
        "urn:release:lambda-1; lambda; Wed, 04 Jan 2023 12:00:00; \
         https://aws.amazon.com/about-aws/whats-new/2023/01/lambda/; \
         Lambda update; Lambda now does a thing.\n"
    );

    let uploads = store.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    let (path, bucket, object_name) = &uploads[0];
    assert_eq!(path, &work_path);
    assert_eq!(bucket, "release-archive");
    assert_eq!(object_name, "2023-01-05T00:00:00_output.csv");

    let published = notifier.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (topic, subject, message) = &published[0];
    assert_eq!(topic, "arn:aws:sns:us-east-1:123456789012:releases");
    assert_eq!(subject, "AWS Feed. New updates available!");
    assert!(message.contains("There are 1 new releases."));
    assert!(message.contains("s3://release-archive/2023-01-05T00:00:00_output.csv"));
}

#[tokio::test]
async fn stale_feed_skips_without_artifact_or_notification() {
    let dir = TempDir::new().unwrap();
    let work_path = dir.path().join("output.csv");

    let config = test_config();
    let source = StaticSource {
        snapshot: FeedSnapshot {
            updated: "Sun, 01 Jan 2023 10:00:00 +0000".to_string(),
            entries: vec![],
        },
    };
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();

    let outcome = Runner::new(&config, &source, &store, &notifier)
        .with_work_path(work_path.clone())
        .run_at(run_instant())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::SkippedStale);
    assert_eq!(outcome.exit_code(), 123);
    assert!(!work_path.exists());
    assert!(store.uploads.lock().unwrap().is_empty());
    assert!(notifier.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_failure_sends_the_failure_notification_and_aborts() {
    let dir = TempDir::new().unwrap();
    let work_path = dir.path().join("output.csv");

    let config = test_config();
    let source = StaticSource {
        snapshot: fresh_snapshot(),
    };
    let store = RecordingStore {
        fail_with: Some(StorageError {
            code: "InternalError".to_string(),
            message: "We encountered an internal error. Please try again.".to_string(),
        }),
        ..Default::default()
    };
    let notifier = RecordingNotifier::default();

    let outcome = Runner::new(&config, &source, &store, &notifier)
        .with_work_path(work_path)
        .run_at(run_instant())
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::UploadFailed);
    assert_eq!(outcome.exit_code(), 1);

    let published = notifier.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (_, subject, message) = &published[0];
    assert_eq!(subject, "AWS Feed. Error when uploading file.");
    assert!(message.contains("Error code - InternalError"));
    assert!(message.contains("We encountered an internal error."));
}

#[tokio::test]
async fn a_stale_artifact_at_the_work_path_is_replaced() {
    let dir = TempDir::new().unwrap();
    let work_path = dir.path().join("output.csv");
    std::fs::write(&work_path, "leftover row from an earlier run\n").unwrap();

    let config = test_config();
    let source = StaticSource {
        snapshot: fresh_snapshot(),
    };
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();

    Runner::new(&config, &source, &store, &notifier)
        .with_work_path(work_path.clone())
        .run_at(run_instant())
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&work_path).unwrap();
    assert!(!contents.contains("leftover"));
    assert!(contents.starts_with("urn:release:lambda-1; "));
}

#[tokio::test]
async fn a_malformed_entry_timestamp_fails_the_run() {
    let dir = TempDir::new().unwrap();

    let mut snapshot = fresh_snapshot();
    snapshot.entries[0].published = "yesterday".to_string();

    let config = test_config();
    let source = StaticSource { snapshot };
    let store = RecordingStore::default();
    let notifier = RecordingNotifier::default();

    let result = Runner::new(&config, &source, &store, &notifier)
        .with_work_path(dir.path().join("output.csv"))
        .run_at(run_instant())
        .await;

    assert!(result.is_err());
    assert!(store.uploads.lock().unwrap().is_empty());
    assert!(notifier.published.lock().unwrap().is_empty());
}
