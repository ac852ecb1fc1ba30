use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use crate::config::Config;
use crate::models::listing::{InsertedListing, NewListing};

const LISTINGS_COLLECTION: &str = "listings";

/// The document database collaborator: insert one document into the
/// listings collection, with the creation timestamp assigned server-side.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, listing: &NewListing) -> Result<InsertedListing>;
}

pub struct HttpListingStore {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl HttpListingStore {
    pub fn new(config: Arc<Config>) -> HttpListingStore {
        HttpListingStore {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ListingStore for HttpListingStore {
    async fn insert(&self, listing: &NewListing) -> Result<InsertedListing> {
        let url = format!(
            "{}/v1/collections/{}",
            self.config.listings_service_url, LISTINGS_COLLECTION
        );

        let inserted: InsertedListing = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .query(&[("timestamp_field", "createdAt")])
            .json(listing)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!(
            "inserted listing {} into '{}' at {}",
            inserted.id, LISTINGS_COLLECTION, inserted.created_at
        );
        Ok(inserted)
    }
}
