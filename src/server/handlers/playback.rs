//! Playback session endpoints
//!
//! A thin player UI drives its session here: one POST to open it, one
//! POST per media-surface event, and the response always carries the
//! directive telling the player which surface should be hot next. The
//! player applies directives verbatim and never decides ad logic
//! itself.

use crate::ad::store;
use crate::error::Result;
use crate::metrics;
use crate::playback::session::{Directive, PlaybackSession, SessionSnapshot};
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Media-surface events the player reports
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    ContentProgress { position_secs: f64 },
    ContentEnded,
    AdProgress { position_secs: f64 },
    AdEnded,
    AdError,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub directive: Directive,
    pub state: SessionSnapshot,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub directive: Directive,
    pub state: SessionSnapshot,
}

/// Open a playback session for a content item.
///
/// Placements are resolved once, here; a catalog failure degrades to
/// content-only playback rather than failing the request.
pub async fn create_session(
    Path(content_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let placements = store::load_placements(state.store.as_ref(), &content_id).await;

    let session_id = Uuid::new_v4().to_string();
    let mut session = PlaybackSession::new(
        session_id.clone(),
        content_id.clone(),
        placements,
        state.store.clone(),
        state.config.view_threshold_secs,
    );
    let directive = session.begin();
    let snapshot = session.snapshot();
    state.sessions.insert(session);

    info!(
        "Opened playback session {} for content {}",
        session_id, content_id
    );
    metrics::record_session_started();
    metrics::set_active_sessions(state.sessions.session_count());

    Ok(Json(CreateSessionResponse {
        session_id,
        directive,
        state: snapshot,
    })
    .into_response())
}

/// Apply one media-surface event and return the next directive
pub async fn session_event(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(event): Json<PlayerEvent>,
) -> Result<Response> {
    let (directive, snapshot) = state.sessions.with_session(&session_id, |session| {
        let directive = match event {
            PlayerEvent::ContentProgress { position_secs } => {
                session.content_progress(position_secs)
            }
            PlayerEvent::ContentEnded => session.content_ended(),
            PlayerEvent::AdProgress { position_secs } => session.ad_progress(position_secs),
            PlayerEvent::AdEnded => session.ad_ended(),
            PlayerEvent::AdError => session.ad_error(),
        };
        (directive, session.snapshot())
    })?;

    finish_if_ended(&state, &session_id, &directive);

    Ok(Json(EventResponse {
        directive,
        state: snapshot,
    })
    .into_response())
}

/// Skip the active ad; 409 while the countdown is still running
pub async fn skip_ad(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let (directive, snapshot) = state
        .sessions
        .with_session(&session_id, |session| {
            let directive = session.skip()?;
            Ok::<_, crate::error::AdweaveError>((directive, session.snapshot()))
        })??;

    info!("Session {}: viewer skipped the active ad", session_id);
    finish_if_ended(&state, &session_id, &directive);

    Ok(Json(EventResponse {
        directive,
        state: snapshot,
    })
    .into_response())
}

/// Read-only session state
pub async fn session_snapshot(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let snapshot = state
        .sessions
        .with_session(&session_id, |session| session.snapshot())?;
    Ok(Json(snapshot).into_response())
}

/// Viewer closed the player or navigated away
pub async fn close_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    match state.sessions.remove(&session_id) {
        Some(_) => {
            info!("Closed playback session {}", session_id);
            metrics::set_active_sessions(state.sessions.session_count());
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        None => Err(crate::error::AdweaveError::SessionNotFound(session_id)),
    }
}

/// Drop ended sessions from the registry as soon as their terminal
/// directive goes out; the TTL sweep is only a backstop
fn finish_if_ended(state: &AppState, session_id: &str, directive: &Directive) {
    if *directive == Directive::EndSession {
        state.sessions.remove(session_id);
        metrics::set_active_sessions(state.sessions.session_count());
    }
}
