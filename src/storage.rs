use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::types::{Result, StorageError};

/// Object storage the finished artifact is handed to.
///
/// `put` mirrors the collaborator contract: success, or a failure carrying
/// the backend's error code and message for the failure notification.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        local_path: &Path,
        bucket: &str,
        object_name: &str,
    ) -> std::result::Result<(), StorageError>;
}

/// S3-compatible HTTP gateway backend: the artifact bytes are PUT to
/// `<endpoint>/<bucket>/<object_name>`.
pub struct HttpObjectStore {
    endpoint: String,
    client: Client,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str) -> Result<Self> {
        Url::parse(endpoint)?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(
        &self,
        local_path: &Path,
        bucket: &str,
        object_name: &str,
    ) -> std::result::Result<(), StorageError> {
        let body = tokio::fs::read(local_path).await.map_err(|e| StorageError {
            code: "LocalReadError".to_string(),
            message: format!("{}: {}", local_path.display(), e),
        })?;

        let target = format!("{}/{}/{}", self.endpoint, bucket, object_name);
        debug!("Uploading {} bytes to {}", body.len(), target);

        let response = self
            .client
            .put(&target)
            .header("content-type", "text/csv")
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError {
                code: "RequestError".to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, "Object store returned non-success");
            return Err(StorageError {
                code: status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .replace(' ', ""),
                message,
            });
        }

        Ok(())
    }
}
