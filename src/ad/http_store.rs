use crate::ad::placement::{Impression, Placement};
use crate::ad::store::CatalogStore;
use crate::error::{AdweaveError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Catalog store backed by the remote catalog service
///
/// Endpoints:
/// - `GET  {base}/contents/{id}/placements` — placement list
/// - `POST {base}/impressions` — one airing outcome
/// - `POST {base}/contents/{id}/views` — view-counter increment
///
/// Requests carry short timeouts so a slow catalog can delay session
/// start only briefly; the session layer degrades failures to
/// content-only playback.
#[derive(Clone, Debug)]
pub struct HttpCatalogStore {
    base_url: String,
    http_client: Client,
    timeout: Duration,
}

/// Response body of the view-counter increment
#[derive(Debug, Deserialize)]
struct ViewCountResponse {
    views: u64,
}

impl HttpCatalogStore {
    /// Create a new HttpCatalogStore
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the catalog service
    /// * `http_client` - Shared HTTP client for connection pooling
    pub fn new(base_url: &str, http_client: Client) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| AdweaveError::Config(format!("Invalid catalog URL {}: {}", base_url, e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            timeout: Duration::from_millis(2000),
        })
    }
}

#[async_trait]
impl CatalogStore for HttpCatalogStore {
    async fn fetch_placements(&self, content_id: &str) -> Result<Vec<Placement>> {
        let url = format!("{}/contents/{}/placements", self.base_url, content_id);
        debug!("Fetching placements from {}", url);

        let placements = self
            .http_client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Placement>>()
            .await?;

        Ok(placements)
    }

    async fn record_impression(&self, impression: &Impression) -> Result<()> {
        let url = format!("{}/impressions", self.base_url);

        self.http_client
            .post(&url)
            .timeout(self.timeout)
            .json(impression)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn increment_views(&self, content_id: &str) -> Result<u64> {
        let url = format!("{}/contents/{}/views", self.base_url, content_id);

        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .json::<ViewCountResponse>()
            .await?;

        Ok(response.views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpCatalogStore::new("https://catalog.example.com/", Client::new()).unwrap();
        assert_eq!(store.base_url, "https://catalog.example.com");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(HttpCatalogStore::new("not a url", Client::new()).is_err());
    }
}
