use crate::ad::placement::Impression;
use crate::ad::store::CatalogStore;
use crate::metrics;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Dispatch an impression write (fire-and-forget)
///
/// Spawns a background task. Does not block the caller, and the state
/// machine never waits on the result: a recording fault is logged and
/// counted, nothing more. No retries.
pub fn dispatch_impression(store: Arc<dyn CatalogStore>, impression: Impression) {
    tokio::spawn(async move {
        match store.record_impression(&impression).await {
            Ok(()) => {
                debug!(
                    "Impression recorded: ad {} on content {} ({}, {}s, completed={})",
                    impression.ad_id,
                    impression.content_id,
                    impression.placement_type,
                    impression.watched_seconds,
                    impression.completed
                );
                metrics::record_impression_write("success");
            }
            Err(e) => {
                warn!(
                    "Impression write failed for ad {} on content {}: {}",
                    impression.ad_id, impression.content_id, e
                );
                metrics::record_impression_write("error");
            }
        }
    });
}

/// Dispatch a view-counter increment (fire-and-forget)
///
/// Same contract as impressions: best effort, never surfaced to the
/// viewer, never retried.
pub fn dispatch_view_count(store: Arc<dyn CatalogStore>, content_id: String) {
    tokio::spawn(async move {
        match store.increment_views(&content_id).await {
            Ok(total) => {
                info!("View counted for content {} (total: {})", content_id, total);
                metrics::record_view_count("success");
            }
            Err(e) => {
                warn!("View increment failed for content {}: {}", content_id, e);
                metrics::record_view_count("error");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad::placement::PlacementClass;
    use crate::ad::store::StaticCatalogStore;
    use chrono::Utc;
    use std::time::Duration;

    fn impression(content_id: &str) -> Impression {
        Impression {
            ad_id: "ad-1".to_string(),
            content_id: content_id.to_string(),
            placement_type: PlacementClass::MidRoll,
            watched_seconds: 7,
            completed: false,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_impression_writes_in_background() {
        let store = Arc::new(StaticCatalogStore::new());
        dispatch_impression(store.clone(), impression("content-1"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let recorded = store.impressions_for("content-1");
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].watched_seconds, 7);
        assert!(!recorded[0].completed);
    }

    #[tokio::test]
    async fn test_dispatch_view_count_increments_in_background() {
        let store = Arc::new(StaticCatalogStore::new());
        dispatch_view_count(store.clone(), "content-2".to_string());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.views_for("content-2"), 1);
    }

    #[tokio::test]
    async fn test_dispatch_against_failing_store_is_silent() {
        // A failing store must not panic or surface anything
        let store = Arc::new(StaticCatalogStore::failing());
        dispatch_view_count(store.clone(), "content-3".to_string());
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
