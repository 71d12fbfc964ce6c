use crate::ad::placement::Ad;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Skip eligibility snapshot for API responses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkipStatus {
    pub eligible: bool,
    /// Seconds left on the countdown; absent for non-skippable ads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u32>,
}

/// Countdown gate on the skip action for one ad airing.
///
/// For a skippable ad the gate spawns a ticker that decrements the
/// countdown once per real-world second, independent of the ad's own
/// playback rate or stalls. Skip becomes eligible the instant the
/// countdown hits zero. The ticker is aborted when the gate is
/// cancelled or dropped, so it can never fire against a dead airing.
///
/// Non-skippable ads get an inert gate that is never eligible.
#[derive(Debug)]
pub struct SkipGate {
    remaining: Option<Arc<AtomicU32>>,
    ticker: Option<JoinHandle<()>>,
}

impl SkipGate {
    /// Start the gate for an ad entering its airing
    pub fn start(ad: &Ad) -> Self {
        if !ad.is_skippable {
            return Self {
                remaining: None,
                ticker: None,
            };
        }

        // Contract demands skip_after >= 1; clamp rather than trust
        let remaining = Arc::new(AtomicU32::new(ad.skip_after_secs.max(1)));
        let counter = Arc::clone(&remaining);
        let ad_id = ad.id.clone();

        let ticker = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick resolves immediately; the countdown starts on the next
            tick.tick().await;
            loop {
                tick.tick().await;
                let left = counter.load(Ordering::Acquire).saturating_sub(1);
                counter.store(left, Ordering::Release);
                if left == 0 {
                    debug!("Skip gate open for ad {}", ad_id);
                    break;
                }
            }
        });

        Self {
            remaining: Some(remaining),
            ticker: Some(ticker),
        }
    }

    /// Whether the viewer may skip right now
    pub fn eligible(&self) -> bool {
        match &self.remaining {
            Some(remaining) => remaining.load(Ordering::Acquire) == 0,
            None => false,
        }
    }

    pub fn status(&self) -> SkipStatus {
        SkipStatus {
            eligible: self.eligible(),
            remaining_secs: self
                .remaining
                .as_ref()
                .map(|r| r.load(Ordering::Acquire)),
        }
    }

    /// Stop the countdown ticker. Idempotent; also runs on drop.
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for SkipGate {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn skippable_ad(skip_after_secs: u32) -> Ad {
        Ad {
            id: "ad-skip".to_string(),
            title: "Skippable".to_string(),
            description: None,
            video_url: "https://ads.example.com/skip.mp4".to_string(),
            is_skippable: true,
            skip_after_secs,
            duration_secs: 30,
        }
    }

    fn unskippable_ad() -> Ad {
        Ad {
            is_skippable: false,
            ..skippable_ad(5)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ineligible_until_countdown_elapses() {
        let gate = SkipGate::start(&skippable_ad(5));
        assert!(!gate.eligible());

        // 4.5s in: four ticks fired, one second left
        sleep(Duration::from_millis(4500)).await;
        assert!(!gate.eligible());
        assert_eq!(gate.status().remaining_secs, Some(1));

        // 5.5s in: the fifth tick opened the gate
        sleep(Duration::from_millis(1000)).await;
        assert!(gate.eligible());
        assert_eq!(gate.status().remaining_secs, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_eligible_after_opening() {
        let gate = SkipGate::start(&skippable_ad(1));
        sleep(Duration::from_millis(1500)).await;
        assert!(gate.eligible());

        sleep(Duration::from_secs(60)).await;
        assert!(gate.eligible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_skippable_never_eligible() {
        let gate = SkipGate::start(&unskippable_ad());
        sleep(Duration::from_secs(600)).await;

        assert!(!gate.eligible());
        let status = gate.status();
        assert!(!status.eligible);
        assert_eq!(status.remaining_secs, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_freezes_countdown() {
        let mut gate = SkipGate::start(&skippable_ad(5));
        sleep(Duration::from_millis(2500)).await;
        gate.cancel();

        // The ticker is gone; the countdown never reaches zero
        sleep(Duration::from_secs(60)).await;
        assert!(!gate.eligible());
        assert_eq!(gate.status().remaining_secs, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_after_zero_clamped_to_one() {
        let gate = SkipGate::start(&skippable_ad(0));
        assert!(!gate.eligible());

        sleep(Duration::from_millis(1500)).await;
        assert!(gate.eligible());
    }
}
