use crate::ad::placement::Ad;
use serde::{Deserialize, Serialize};

/// Content items shown before the first standard slot
const LEAD_ITEMS: usize = 4;
/// Content items between cycling standard slots
const ITEMS_PER_SLOT: usize = 6;
/// Ads held back for the premium and first standard slots
const RESERVED_ADS: usize = 2;

/// A licensed content item as rendered in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub views: u64,
}

/// Slot tier for a sponsored feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Top-of-feed slot, always `ads[0]`
    Premium,
    Standard,
}

/// One rendered feed position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedEntry {
    Content(ContentItem),
    Ad { slot: SlotKind, ad: Ad },
}

impl FeedEntry {
    fn ad(slot: SlotKind, ad: Ad) -> Self {
        FeedEntry::Ad { slot, ad }
    }

    pub fn is_ad(&self) -> bool {
        matches!(self, FeedEntry::Ad { .. })
    }
}

/// Merge an ordered content list with an ad pool into one rendered
/// sequence.
///
/// Layout: `ads[0]` opens the feed as a premium slot, the first four
/// content items follow, then `ads[1]` as a standard slot; after that,
/// every sixth content item is followed by a standard slot cycling
/// through the remaining pool (`ads[2..]`) with wraparound. A short ad
/// pool just means fewer slots — content items are never reordered or
/// dropped.
///
/// Stateless and deterministic: identical inputs produce the identical
/// sequence on every call.
pub fn interleave(items: &[ContentItem], ads: &[Ad]) -> Vec<FeedEntry> {
    let mut feed = Vec::with_capacity(items.len() + items.len() / ITEMS_PER_SLOT + RESERVED_ADS);

    if let Some(premium) = ads.first() {
        feed.push(FeedEntry::ad(SlotKind::Premium, premium.clone()));
    }

    let lead = items.len().min(LEAD_ITEMS);
    feed.extend(items[..lead].iter().cloned().map(FeedEntry::Content));

    if let Some(standard) = ads.get(1) {
        feed.push(FeedEntry::ad(SlotKind::Standard, standard.clone()));
    }

    let pool = &ads[RESERVED_ADS.min(ads.len())..];
    let mut emitted = 0usize;
    let mut slot = 0usize;
    for item in &items[lead..] {
        feed.push(FeedEntry::Content(item.clone()));
        emitted += 1;
        if emitted % ITEMS_PER_SLOT == 0 && !pool.is_empty() {
            feed.push(FeedEntry::ad(SlotKind::Standard, pool[slot % pool.len()].clone()));
            slot += 1;
        }
    }

    feed
}
