use std::env;
use url::Url;

/// Where placement fetches, impression writes, and view increments go
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogStoreType {
    /// In-memory store with a built-in demo catalog (dev and tests)
    Static,
    /// Remote catalog service over HTTP
    Http,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    pub is_dev: bool,
    pub catalog_store: CatalogStoreType,
    pub catalog_url: Option<String>,
    /// Content watch time (ad time excluded) before a view is counted
    pub view_threshold_secs: u64,
    /// Auto-advance interval for ad carousel surfaces
    pub carousel_rotation_secs: u64,
    /// Idle time before an abandoned playback session is swept
    pub session_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// In DEV mode, provides sensible defaults. In PROD mode, PORT,
    /// BASE_URL, and CATALOG_URL are required.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Check if running in dev mode
        let is_dev = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Port: required in prod, defaults to 3000 in dev
        let port = if is_dev {
            env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?
        } else {
            env::var("PORT")
                .map_err(|_| "PORT is required in production")?
                .parse()?
        };

        // Base URL: required in prod, defaults to localhost in dev
        let base_url = if is_dev {
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
        } else {
            env::var("BASE_URL").map_err(|_| "BASE_URL is required in production")?
        };

        // Catalog store: static demo catalog in dev, remote service in prod
        let catalog_store = match env::var("CATALOG_STORE") {
            Ok(value) => match value.as_str() {
                "static" => CatalogStoreType::Static,
                "http" => CatalogStoreType::Http,
                other => return Err(format!("Unknown CATALOG_STORE: {}", other).into()),
            },
            Err(_) => {
                if is_dev {
                    CatalogStoreType::Static
                } else {
                    CatalogStoreType::Http
                }
            }
        };

        // Catalog URL: required whenever the HTTP store is selected
        let catalog_url = match env::var("CATALOG_URL") {
            Ok(raw) => {
                Url::parse(&raw).map_err(|e| format!("Invalid CATALOG_URL: {}", e))?;
                Some(raw.trim_end_matches('/').to_string())
            }
            Err(_) => {
                if catalog_store == CatalogStoreType::Http {
                    return Err("CATALOG_URL is required when CATALOG_STORE=http".into());
                }
                None
            }
        };

        // View threshold: defaults to 30 seconds
        let view_threshold_secs = env::var("VIEW_THRESHOLD_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Carousel rotation interval: defaults to 5 seconds
        let carousel_rotation_secs = env::var("CAROUSEL_ROTATION_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        // Session TTL: defaults to 30 minutes
        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()
            .unwrap_or(1800);

        Ok(Config {
            port,
            base_url,
            is_dev,
            catalog_store,
            catalog_url,
            view_threshold_secs,
            carousel_rotation_secs,
            session_ttl_secs,
        })
    }
}
