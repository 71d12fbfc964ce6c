use crate::{
    ad::{CatalogStore, HttpCatalogStore, StaticCatalogStore},
    config::{CatalogStoreType, Config},
    session::SessionManager,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Shared HTTP client for connection pooling
    pub http_client: Client,
    /// Registry of live playback sessions
    pub sessions: SessionManager,
    /// Catalog store for placements, impressions, and view counts
    pub store: Arc<dyn CatalogStore>,
    /// Server start time for uptime tracking
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to create HTTP client");

        let sessions = SessionManager::new(Duration::from_secs(config.session_ttl_secs));

        // Create catalog store based on config
        let store: Arc<dyn CatalogStore> = match config.catalog_store {
            CatalogStoreType::Http => {
                let catalog_url = config
                    .catalog_url
                    .as_deref()
                    .expect("CATALOG_URL is required when CATALOG_STORE=http");
                info!("Catalog store: HTTP (url: {})", catalog_url);
                Arc::new(
                    HttpCatalogStore::new(catalog_url, http_client.clone())
                        .expect("CATALOG_URL was validated at config load"),
                )
            }
            CatalogStoreType::Static => {
                info!("Catalog store: static demo catalog");
                Arc::new(StaticCatalogStore::with_demo_placements())
            }
        };

        Self {
            config: Arc::new(config),
            http_client,
            sessions,
            store,
            started_at: Instant::now(),
        }
    }
}
