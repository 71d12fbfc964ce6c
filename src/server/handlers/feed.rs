use crate::ad::placement::Ad;
use crate::feed::interleaver::{self, ContentItem, FeedEntry};
use crate::metrics;
use crate::server::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One page of content plus the ad pool, as loaded by the host's feed
/// and ad sources
#[derive(Debug, Deserialize)]
pub struct InterleaveRequest {
    #[serde(default)]
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub ads: Vec<Ad>,
}

#[derive(Serialize)]
pub struct InterleaveResponse {
    pub entries: Vec<FeedEntry>,
    /// Auto-advance interval for any carousel rendered from the slots
    pub carousel_rotation_secs: u64,
}

/// Merge a content page with an ad pool into one rendered sequence
pub async fn interleave_feed(
    State(state): State<AppState>,
    Json(request): Json<InterleaveRequest>,
) -> impl IntoResponse {
    let entries = interleaver::interleave(&request.items, &request.ads);

    let slots = entries.len() - request.items.len();
    debug!(
        "Interleaved feed: {} item(s) + {} ad slot(s)",
        request.items.len(),
        slots
    );
    metrics::record_feed_slots(slots);

    Json(InterleaveResponse {
        entries,
        carousel_rotation_secs: state.config.carousel_rotation_secs,
    })
}
