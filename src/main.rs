use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use release_watch::{
    Config, HttpFeedSource, HttpObjectStore, Runner, RunOutcome, WebhookNotifier,
};

async fn execute() -> anyhow::Result<RunOutcome> {
    let config = Config::from_env().context("reading configuration")?;

    let source = HttpFeedSource::new(config.feed_url.clone());
    let store = HttpObjectStore::new(&config.storage_endpoint)
        .context("constructing the object store backend")?;
    let notifier = WebhookNotifier::new(config.notify_webhook_url.clone());

    let runner = Runner::new(&config, &source, &store, &notifier);
    let outcome = runner.run().await?;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    info!("Starting release-watch run");

    match execute().await {
        Ok(outcome) => {
            match &outcome {
                RunOutcome::Completed(result) => {
                    info!("{} {}", result.status_code, result.body)
                }
                RunOutcome::SkippedStale => info!("Feed is stale, nothing to do"),
                RunOutcome::UploadFailed => error!("Run aborted after upload failure"),
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}
