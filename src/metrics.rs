use metrics::{counter, gauge};

use crate::ad::PlacementClass;

// ── Metric names ────────────────────────────────────────────────────────

/// Playback sessions created
pub const SESSIONS_STARTED: &str = "adweave_sessions_started_total";
/// Currently active playback sessions
pub const ACTIVE_SESSIONS: &str = "adweave_active_sessions";
/// Placements loaded from the catalog
pub const PLACEMENTS_LOADED: &str = "adweave_placements_loaded_total";
/// Placement catalog fetch failures (sessions degraded to content-only)
pub const CATALOG_FETCH_FAILURES: &str = "adweave_catalog_fetch_failures_total";
/// Ad airings started, by placement class
pub const ADS_STARTED: &str = "adweave_ads_started_total";
/// Ad airings finished, by outcome (completed, skipped, error)
pub const ADS_FINISHED: &str = "adweave_ads_finished_total";
/// Impression writes by result (success, error)
pub const IMPRESSION_WRITES: &str = "adweave_impression_writes_total";
/// View-counter increments by result (success, error)
pub const VIEW_COUNTS: &str = "adweave_view_counts_total";
/// Ad slots inserted into interleaved feeds
pub const FEED_SLOTS_INSERTED: &str = "adweave_feed_slots_inserted_total";

// ── Recording helpers ───────────────────────────────────────────────────

/// Record a new playback session
pub fn record_session_started() {
    counter!(SESSIONS_STARTED).increment(1);
}

/// Update active session count
pub fn set_active_sessions(count: usize) {
    gauge!(ACTIVE_SESSIONS).set(count as f64);
}

/// Record placements loaded for a session
pub fn record_placements_loaded(count: usize) {
    counter!(PLACEMENTS_LOADED).increment(count as u64);
}

/// Record a catalog fetch failure
pub fn record_catalog_failure() {
    counter!(CATALOG_FETCH_FAILURES).increment(1);
}

/// Record an ad airing start
pub fn record_ad_started(class: PlacementClass) {
    counter!(ADS_STARTED, "placement" => class.as_str()).increment(1);
}

/// Record an ad airing outcome (completed, skipped, error)
pub fn record_ad_finished(outcome: &'static str) {
    counter!(ADS_FINISHED, "outcome" => outcome).increment(1);
}

/// Record an impression write result
pub fn record_impression_write(result: &'static str) {
    counter!(IMPRESSION_WRITES, "result" => result).increment(1);
}

/// Record a view-counter increment result
pub fn record_view_count(result: &'static str) {
    counter!(VIEW_COUNTS, "result" => result).increment(1);
}

/// Record ad slots inserted into a rendered feed
pub fn record_feed_slots(count: usize) {
    counter!(FEED_SLOTS_INSERTED).increment(count as u64);
}
