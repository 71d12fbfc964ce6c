/// Largest per-tick watch-time credit in seconds.
///
/// Time updates arrive a few times per second; a delta larger than this
/// is a seek, not watching, and must not teleport the view threshold.
const MAX_TICK_DELTA_SECS: f64 = 2.0;

/// Marks a content item "counted as viewed" exactly once per session.
///
/// Accumulates content watch time from per-tick position deltas (ad
/// time never reaches this tracker, since it only ticks while content
/// is the hot surface). The first crossing of the threshold reports
/// "count now"; every later call is a no-op.
#[derive(Debug)]
pub struct ViewTracker {
    threshold_secs: f64,
    watched_secs: f64,
    counted: bool,
}

impl ViewTracker {
    pub fn new(threshold_secs: f64) -> Self {
        Self {
            threshold_secs,
            watched_secs: 0.0,
            counted: false,
        }
    }

    /// Credit a position delta and report whether to count the view now.
    ///
    /// Backward deltas (seeks, loops) are ignored; forward deltas are
    /// capped at [`MAX_TICK_DELTA_SECS`]. Returns true exactly once.
    pub fn record(&mut self, delta_secs: f64) -> bool {
        if delta_secs > 0.0 {
            self.watched_secs += delta_secs.min(MAX_TICK_DELTA_SECS);
        }
        if !self.counted && self.watched_secs >= self.threshold_secs {
            self.counted = true;
            return true;
        }
        false
    }

    pub fn watched_secs(&self) -> f64 {
        self.watched_secs
    }

    pub fn counted(&self) -> bool {
        self.counted
    }
}
