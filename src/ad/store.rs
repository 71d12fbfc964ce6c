use crate::ad::placement::{Ad, Impression, Placement, PlacementKind};
use crate::error::{AdweaveError, Result};
use crate::metrics;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{info, warn};

/// Trait for the external catalog service
///
/// Covers the three narrow interfaces the engine consumes: placement
/// lookup on session start, impression writes on airing end, and the
/// view-counter increment. This abstraction allows swapping the remote
/// service for an in-memory store in dev mode and tests.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch the placements bound to a content item, in catalog order
    async fn fetch_placements(&self, content_id: &str) -> Result<Vec<Placement>>;

    /// Write one airing outcome. Best effort, no retries.
    async fn record_impression(&self, impression: &Impression) -> Result<()>;

    /// Increment the content item's view counter, returning the new total
    async fn increment_views(&self, content_id: &str) -> Result<u64>;
}

/// Load placements for a session, degrading to content-only on failure
///
/// A dead or misconfigured catalog must never stop content playback, so
/// every failure collapses to an empty placement list here. Callers get
/// no error to handle.
pub async fn load_placements(store: &dyn CatalogStore, content_id: &str) -> Vec<Placement> {
    match store.fetch_placements(content_id).await {
        Ok(placements) => {
            info!(
                "Loaded {} placement(s) for content {}",
                placements.len(),
                content_id
            );
            metrics::record_placements_loaded(placements.len());
            placements
        }
        Err(e) => {
            warn!(
                "Placement catalog unavailable for content {}: {} — continuing without ads",
                content_id, e
            );
            metrics::record_catalog_failure();
            Vec::new()
        }
    }
}

/// In-memory catalog store
///
/// Serves a fixed placement set per content id (with an optional
/// fallback set for unknown ids), and records impressions and view
/// counts into process memory. Backs dev mode and the test suites.
#[derive(Debug, Default)]
pub struct StaticCatalogStore {
    placements: DashMap<String, Vec<Placement>>,
    fallback: Vec<Placement>,
    impressions: DashMap<String, Vec<Impression>>,
    views: DashMap<String, u64>,
    offline: bool,
}

impl StaticCatalogStore {
    /// Create an empty store: no placements, content-only playback
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store where every operation fails (catalog-outage tests)
    pub fn failing() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(AdweaveError::Internal(
                "static catalog store configured to fail".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a store that serves the demo placement set for every
    /// content id: one skippable pre-roll, one mid-roll at 30s, one
    /// post-roll.
    pub fn with_demo_placements() -> Self {
        Self {
            fallback: demo_placements(),
            ..Self::default()
        }
    }

    /// Bind a placement set to a specific content id
    pub fn insert_placements(&self, content_id: &str, placements: Vec<Placement>) {
        self.placements.insert(content_id.to_string(), placements);
    }

    /// Impressions recorded for a content id, in write order
    pub fn impressions_for(&self, content_id: &str) -> Vec<Impression> {
        self.impressions
            .get(content_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Current view count for a content id
    pub fn views_for(&self, content_id: &str) -> u64 {
        self.views.get(content_id).map(|v| *v).unwrap_or(0)
    }
}

#[async_trait]
impl CatalogStore for StaticCatalogStore {
    async fn fetch_placements(&self, content_id: &str) -> Result<Vec<Placement>> {
        self.check_online()?;
        Ok(self
            .placements
            .get(content_id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| self.fallback.clone()))
    }

    async fn record_impression(&self, impression: &Impression) -> Result<()> {
        self.check_online()?;
        self.impressions
            .entry(impression.content_id.clone())
            .or_default()
            .push(impression.clone());
        Ok(())
    }

    async fn increment_views(&self, content_id: &str) -> Result<u64> {
        self.check_online()?;
        let mut entry = self.views.entry(content_id.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }
}

/// Demo ads used by the static store and the demo feed endpoint.
///
/// Creatives point at the Chromecast sample clips, which are short,
/// public, and shaped like real ad spots.
pub fn demo_ads() -> Vec<Ad> {
    vec![
        Ad {
            id: "demo-ad-blazes".to_string(),
            title: "For Bigger Blazes".to_string(),
            description: Some("Demo sponsor spot".to_string()),
            video_url:
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4"
                    .to_string(),
            is_skippable: true,
            skip_after_secs: 5,
            duration_secs: 15,
        },
        Ad {
            id: "demo-ad-escapes".to_string(),
            title: "For Bigger Escapes".to_string(),
            description: None,
            video_url:
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4"
                    .to_string(),
            is_skippable: false,
            skip_after_secs: 5,
            duration_secs: 15,
        },
        Ad {
            id: "demo-ad-fun".to_string(),
            title: "For Bigger Fun".to_string(),
            description: None,
            video_url:
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4"
                    .to_string(),
            is_skippable: true,
            skip_after_secs: 5,
            duration_secs: 60,
        },
        Ad {
            id: "demo-ad-joyrides".to_string(),
            title: "For Bigger Joyrides".to_string(),
            description: None,
            video_url:
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4"
                    .to_string(),
            is_skippable: true,
            skip_after_secs: 5,
            duration_secs: 15,
        },
    ]
}

/// Demo placement set: pre-roll, mid-roll at 30s, post-roll
fn demo_placements() -> Vec<Placement> {
    let ads = demo_ads();
    vec![
        Placement::new(PlacementKind::PreRoll, ads[0].clone()),
        Placement::new(PlacementKind::MidRoll { offset_secs: 30 }, ads[1].clone()),
        Placement::new(PlacementKind::PostRoll, ads[3].clone()),
    ]
}
