use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Auto-advance-with-manual-override policy for ad carousel surfaces.
///
/// Rotates forward on each timer tick while auto-rotation is live. Any
/// manual navigation — explicit selection, prev/next, or entering
/// playback of a video-bearing slide — kills auto-rotation permanently
/// for this instance; there is no re-enable. The index wraps modulo the
/// item count in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    auto: bool,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            // Nothing to rotate through with zero or one item
            auto: len > 1,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn auto_rotating(&self) -> bool {
        self.auto
    }

    /// Timer tick: step forward only while auto-rotation is live
    pub fn advance(&mut self) {
        if self.auto {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Manual forward navigation; disables auto-rotation
    pub fn next(&mut self) {
        self.auto = false;
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Manual backward navigation; disables auto-rotation
    pub fn prev(&mut self) {
        self.auto = false;
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to a slide; out-of-range indices are ignored but still
    /// count as manual navigation
    pub fn select(&mut self, index: usize) {
        self.auto = false;
        if index < self.len {
            self.index = index;
        }
    }

    /// The current slide entered its play sub-state; rotating away from
    /// a playing video is never acceptable
    pub fn begin_playback(&mut self) {
        self.auto = false;
    }
}

/// Interval task driving a shared [`Carousel`].
///
/// Owned by the surface that started it; aborted on drop so a rotation
/// can never fire against a torn-down carousel. The task also exits on
/// its own once a manual override ends auto-rotation.
#[derive(Debug)]
pub struct RotationTimer {
    task: JoinHandle<()>,
}

impl RotationTimer {
    pub fn spawn(carousel: Arc<Mutex<Carousel>>, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick resolves immediately
            tick.tick().await;
            loop {
                tick.tick().await;
                let Ok(mut carousel) = carousel.lock() else {
                    break;
                };
                if !carousel.auto_rotating() {
                    debug!("Carousel rotation stopped by manual override");
                    break;
                }
                carousel.advance();
            }
        });
        Self { task }
    }
}

impl Drop for RotationTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
