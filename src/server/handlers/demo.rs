use crate::ad::store::demo_ads;
use crate::feed::interleaver::{self, ContentItem, FeedEntry};
use crate::server::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use tracing::info;

/// Demo feed endpoint for eyeballing the interleaver
///
/// Runs a synthetic content page and the demo ad pool through the real
/// interleaver, so the rendered slot layout can be inspected with
/// nothing but a browser.
///
/// Usage:
///   1. Start Adweave: `DEV_MODE=true cargo run`
///   2. Open: http://localhost:3000/demo/feed
///
/// Pair it with the static catalog store (`CATALOG_STORE=static`) and
/// any `POST /playback/{content_id}` call to drive a full demo session:
/// every content id gets a pre-roll, a mid-roll at 30s, and a post-roll.
pub async fn serve_demo_feed(State(state): State<AppState>) -> impl IntoResponse {
    let items = demo_items();
    let ads = demo_ads();
    let entries = interleaver::interleave(&items, &ads);

    info!(
        "Serving demo feed: {} item(s), {} ad(s) in pool, {} rendered position(s)",
        items.len(),
        ads.len(),
        entries.len()
    );

    Json(DemoFeedResponse {
        entries,
        carousel_rotation_secs: state.config.carousel_rotation_secs,
    })
}

#[derive(Serialize)]
pub struct DemoFeedResponse {
    pub entries: Vec<FeedEntry>,
    /// Auto-advance interval for any carousel rendered from the slots
    pub carousel_rotation_secs: u64,
}

/// Synthetic content page built from the public Blender shorts
fn demo_items() -> Vec<ContentItem> {
    const TITLES: [(&str, &str); 10] = [
        ("big-buck-bunny", "Big Buck Bunny"),
        ("elephants-dream", "Elephants Dream"),
        ("sintel", "Sintel"),
        ("tears-of-steel", "Tears of Steel"),
        ("subaru-street", "Subaru Outback On Street And Dirt"),
        ("volkswagen-gti", "Volkswagen GTI Review"),
        ("for-a-grand", "What Car Can You Get For A Grand?"),
        ("bullrun", "We Are Going On Bullrun"),
        ("meridian", "Meridian"),
        ("tos-trailer", "Tears of Steel Trailer"),
    ];

    TITLES
        .iter()
        .map(|(id, title)| ContentItem {
            id: (*id).to_string(),
            title: (*title).to_string(),
            media_url: format!(
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/{}.mp4",
                id
            ),
            poster_url: Some(format!(
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/images/{}.jpg",
                id
            )),
            views: 0,
        })
        .collect()
}
