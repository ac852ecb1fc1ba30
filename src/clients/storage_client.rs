use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;
use crate::models::listing::ImageFile;

/// Chunk size for resumable uploads.
const UPLOAD_CHUNK_BYTES: usize = 256 * 1024;

/// The object storage collaborator: resumable upload of one object under
/// a caller-chosen key, resolving to a publicly fetchable URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, key: &str, image: &ImageFile) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct UploadSession {
    upload_url: String,
}

pub struct HttpObjectStore {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl HttpObjectStore {
    pub fn new(config: Arc<Config>) -> HttpObjectStore {
        HttpObjectStore {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn open_session(&self, key: &str) -> Result<UploadSession> {
        let url = format!(
            "{}/v1/buckets/{}/uploads",
            self.config.storage_service_url, self.config.storage_bucket
        );
        let session = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(session)
    }

    fn public_url(&self, key: &str) -> Result<String> {
        let base = format!(
            "{}/v1/buckets/{}/objects",
            self.config.storage_service_url, self.config.storage_bucket
        );
        let mut url = Url::parse(&base).context("invalid storage service url")?;
        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("alt", "media");
        Ok(url.to_string())
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(&self, key: &str, image: &ImageFile) -> Result<String> {
        let session = self.open_session(key).await?;
        let total = image.bytes.len();

        // Sequential chunked PUTs against the upload session. Progress is
        // diagnostic only.
        for (index, chunk) in image.bytes.chunks(UPLOAD_CHUNK_BYTES).enumerate() {
            let start = index * UPLOAD_CHUNK_BYTES;
            let end = start + chunk.len() - 1;

            self.client
                .put(&session.upload_url)
                .bearer_auth(&self.config.api_key)
                .header(CONTENT_TYPE, &image.content_type)
                .header("Content-Range", format!("bytes {}-{}/{}", start, end, total))
                .body(chunk.to_vec())
                .send()
                .await?
                .error_for_status()?;

            let transferred = start + chunk.len();
            info!(
                "upload of {} is {:.0}% done ({}/{} bytes)",
                key,
                transferred as f64 / total as f64 * 100.0,
                transferred,
                total
            );
        }

        self.public_url(key)
    }
}
