use crate::ad::placement::{Ad, Impression, Placement, PlacementClass, PlacementKind};
use crate::ad::recorder;
use crate::ad::store::CatalogStore;
use crate::error::{AdweaveError, Result};
use crate::metrics;
use crate::playback::scheduler::{self, AiredPlacements, SchedulePoint};
use crate::playback::skip::{SkipGate, SkipStatus};
use crate::playback::view::ViewTracker;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Playback session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Loading,
    PlayingContent,
    PlayingAd,
    Ended,
}

/// The single command the hot media surface must apply next.
///
/// Every session event resolves to exactly one directive, so the player
/// never has to guess which surface owns playback. Surface ownership
/// changes only through these values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Directive {
    /// Keep doing what you are doing
    Stay,
    /// Content surface becomes hot, seeked to the given position
    PlayContent { from_secs: f64 },
    /// Content pauses; the ad surface becomes hot with this creative
    PlayAd {
        placement_type: PlacementClass,
        ad: Ad,
    },
    /// Session is over; the host closes the player
    EndSession,
}

/// Read-only session state for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub content_id: String,
    pub mode: SessionMode,
    pub content_position_secs: f64,
    pub watched_secs: f64,
    pub view_counted: bool,
    /// Present only while an ad is airing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<SkipStatus>,
    pub aired_offsets: Vec<u32>,
}

/// The airing currently holding the ad surface
struct ActiveAiring {
    placement: Placement,
    gate: SkipGate,
    position_secs: f64,
}

/// Orchestrates one viewer's playback of one content item.
///
/// Owns the mode (content vs. ad vs. ended), delegates placement
/// decisions to the scheduler and skip decisions to the gate, and
/// dispatches impression/view writes as fire-and-forget so no external
/// fault can stall a transition. Ephemeral by contract: lives in
/// process memory and dies with the viewer's player.
///
/// Exactly one media surface is hot at any instant. Event methods for
/// the surface that is *not* hot are dropped with a debug log — media
/// elements deliver stale callbacks around every transition and none of
/// them may corrupt state.
pub struct PlaybackSession {
    session_id: String,
    content_id: String,
    placements: Vec<Placement>,
    store: Arc<dyn CatalogStore>,
    mode: SessionMode,
    active: Option<ActiveAiring>,
    aired: AiredPlacements,
    content_position_secs: f64,
    resume_position_secs: f64,
    view: ViewTracker,
    mode_tx: watch::Sender<SessionMode>,
    last_accessed: Instant,
}

impl PlaybackSession {
    /// Create a session in `Loading` with an already-resolved placement
    /// list (see [`crate::ad::store::load_placements`] for the degraded
    /// path when the catalog is unreachable).
    pub fn new(
        session_id: String,
        content_id: String,
        placements: Vec<Placement>,
        store: Arc<dyn CatalogStore>,
        view_threshold_secs: u64,
    ) -> Self {
        let (mode_tx, _) = watch::channel(SessionMode::Loading);
        Self {
            session_id,
            content_id,
            placements,
            store,
            mode: SessionMode::Loading,
            active: None,
            aired: AiredPlacements::new(),
            content_position_secs: 0.0,
            resume_position_secs: 0.0,
            view: ViewTracker::new(view_threshold_secs as f64),
            mode_tx,
            last_accessed: Instant::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_ended(&self) -> bool {
        self.mode == SessionMode::Ended
    }

    /// Observe mode transitions; the receiver lands on `Ended` exactly
    /// when the host should close the player.
    pub fn subscribe_mode(&self) -> watch::Receiver<SessionMode> {
        self.mode_tx.subscribe()
    }

    /// Seconds since the last event, for TTL sweeping
    pub fn idle_secs(&self) -> u64 {
        self.last_accessed.elapsed().as_secs()
    }

    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }

    /// Leave `Loading`: air a pre-roll if one is scheduled, otherwise
    /// hand the surface to content from the start.
    pub fn begin(&mut self) -> Directive {
        if self.mode != SessionMode::Loading {
            debug!("Session {}: begin() after load, ignoring", self.session_id);
            return Directive::Stay;
        }

        if let Some(placement) =
            scheduler::next_placement(&self.placements, SchedulePoint::Start, &self.aired).cloned()
        {
            return self.start_airing(placement);
        }

        self.set_mode(SessionMode::PlayingContent);
        Directive::PlayContent { from_secs: 0.0 }
    }

    /// Content surface time update.
    ///
    /// Credits watch time, runs the view-threshold check, then asks the
    /// scheduler whether a mid-roll is due at this position.
    pub fn content_progress(&mut self, position_secs: f64) -> Directive {
        if self.mode != SessionMode::PlayingContent {
            debug!(
                "Session {}: content progress while {:?}, ignoring",
                self.session_id, self.mode
            );
            return Directive::Stay;
        }

        let delta = position_secs - self.content_position_secs;
        self.content_position_secs = position_secs;

        if self.view.record(delta) {
            info!(
                "Session {}: view threshold reached for content {}",
                self.session_id, self.content_id
            );
            recorder::dispatch_view_count(Arc::clone(&self.store), self.content_id.clone());
        }

        if let Some(placement) = scheduler::next_placement(
            &self.placements,
            SchedulePoint::Progress {
                elapsed_secs: position_secs,
            },
            &self.aired,
        )
        .cloned()
        {
            self.resume_position_secs = position_secs;
            return self.start_airing(placement);
        }

        Directive::Stay
    }

    /// Content surface reached its natural end
    pub fn content_ended(&mut self) -> Directive {
        if self.mode != SessionMode::PlayingContent {
            debug!(
                "Session {}: content ended while {:?}, ignoring",
                self.session_id, self.mode
            );
            return Directive::Stay;
        }

        if let Some(placement) =
            scheduler::next_placement(&self.placements, SchedulePoint::Ended, &self.aired).cloned()
        {
            self.resume_position_secs = self.content_position_secs;
            return self.start_airing(placement);
        }

        self.finish_session()
    }

    /// Ad surface time update; only feeds the watched-seconds figure
    /// reported when the airing is cut short.
    pub fn ad_progress(&mut self, position_secs: f64) -> Directive {
        match (&self.mode, &mut self.active) {
            (SessionMode::PlayingAd, Some(airing)) => {
                airing.position_secs = position_secs;
            }
            _ => {
                debug!(
                    "Session {}: ad progress while {:?}, ignoring",
                    self.session_id, self.mode
                );
            }
        }
        Directive::Stay
    }

    /// Ad creative played to completion
    pub fn ad_ended(&mut self) -> Directive {
        self.finish_airing(true, "completed")
    }

    /// Ad surface faulted (load failure or mid-play error).
    ///
    /// Identical transition to completion, recorded as not completed;
    /// a broken ad asset must never stall the session.
    pub fn ad_error(&mut self) -> Directive {
        if self.mode == SessionMode::PlayingAd {
            warn!(
                "Session {}: ad media fault, advancing past airing",
                self.session_id
            );
        }
        self.finish_airing(false, "error")
    }

    /// Viewer pressed skip. Fails with [`AdweaveError::SkipNotAllowed`]
    /// unless the gate's countdown has elapsed.
    pub fn skip(&mut self) -> Result<Directive> {
        let Some(airing) = &self.active else {
            return Err(AdweaveError::SkipNotAllowed);
        };
        if !airing.gate.eligible() {
            return Err(AdweaveError::SkipNotAllowed);
        }
        Ok(self.finish_airing(false, "skipped"))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            content_id: self.content_id.clone(),
            mode: self.mode,
            content_position_secs: self.content_position_secs,
            watched_secs: self.view.watched_secs(),
            view_counted: self.view.counted(),
            skip: self.active.as_ref().map(|airing| airing.gate.status()),
            aired_offsets: self.aired.aired_offsets(),
        }
    }

    fn set_mode(&mut self, mode: SessionMode) {
        self.mode = mode;
        let _ = self.mode_tx.send(mode);
    }

    /// Hand the surface to an ad. The skip gate starts here and nowhere
    /// else, so a countdown can never outlive its airing.
    fn start_airing(&mut self, placement: Placement) -> Directive {
        let class = placement.kind.class();
        info!(
            "Session {}: starting {} airing of ad {}",
            self.session_id, class, placement.ad.id
        );
        metrics::record_ad_started(class);

        let gate = SkipGate::start(&placement.ad);
        let directive = Directive::PlayAd {
            placement_type: class,
            ad: placement.ad.clone(),
        };
        self.active = Some(ActiveAiring {
            placement,
            gate,
            position_secs: 0.0,
        });
        self.set_mode(SessionMode::PlayingAd);
        directive
    }

    /// Common exit path for completion, fault, and skip.
    ///
    /// Records the impression (fire-and-forget), marks the placement
    /// aired, cancels the gate, then routes by placement kind: pre-roll
    /// resumes content from the start, mid-roll from the paused
    /// position, post-roll ends the session.
    fn finish_airing(&mut self, completed: bool, outcome: &'static str) -> Directive {
        let Some(mut airing) = self.active.take() else {
            debug!(
                "Session {}: airing end while {:?}, ignoring",
                self.session_id, self.mode
            );
            return Directive::Stay;
        };
        airing.gate.cancel();

        let watched_seconds = if completed {
            airing.placement.ad.duration_secs
        } else {
            airing.position_secs.max(0.0).round() as u32
        };

        recorder::dispatch_impression(
            Arc::clone(&self.store),
            Impression {
                ad_id: airing.placement.ad.id.clone(),
                content_id: self.content_id.clone(),
                placement_type: airing.placement.kind.class(),
                watched_seconds,
                completed,
                recorded_at: Utc::now(),
            },
        );
        metrics::record_ad_finished(outcome);
        self.aired.mark(&airing.placement.kind);

        match airing.placement.kind {
            PlacementKind::PreRoll => {
                self.content_position_secs = 0.0;
                self.set_mode(SessionMode::PlayingContent);
                Directive::PlayContent { from_secs: 0.0 }
            }
            PlacementKind::MidRoll { .. } => {
                self.content_position_secs = self.resume_position_secs;
                self.set_mode(SessionMode::PlayingContent);
                Directive::PlayContent {
                    from_secs: self.resume_position_secs,
                }
            }
            PlacementKind::PostRoll => self.finish_session(),
        }
    }

    fn finish_session(&mut self) -> Directive {
        info!(
            "Session {}: ended for content {}",
            self.session_id, self.content_id
        );
        self.set_mode(SessionMode::Ended);
        Directive::EndSession
    }
}
