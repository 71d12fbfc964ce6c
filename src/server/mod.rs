pub mod handlers;
pub mod state;

use crate::config::Config;
use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use state::AppState;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Build the application router around shared state
pub fn build_router_with_state(state: AppState) -> Router {
    // CORS layer: permissive in dev mode for testing with external players
    let cors = if state.config.is_dev {
        info!("CORS: Permissive mode (dev)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS: Restrictive mode (prod)");
        // Default: no CORS headers — origins must be configured for production
        CorsLayer::new()
    };

    let mut app = Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        // Playback session endpoints
        .route(
            "/playback/{content_id}",
            post(handlers::playback::create_session),
        )
        .route(
            "/playback/session/{session_id}",
            get(handlers::playback::session_snapshot).delete(handlers::playback::close_session),
        )
        .route(
            "/playback/session/{session_id}/event",
            post(handlers::playback::session_event),
        )
        .route(
            "/playback/session/{session_id}/skip",
            post(handlers::playback::skip_ad),
        )
        // Feed endpoints
        .route("/feed/interleave", post(handlers::feed::interleave_feed))
        // Demo endpoint: synthetic feed through the real interleaver
        .route("/demo/feed", get(handlers::demo::serve_demo_feed));

    // Prometheus recorder is process-global; a second router (tests)
    // simply goes without the endpoint
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            app = app.route(
                "/metrics",
                get(move || handlers::metrics::serve_metrics(handle.clone())),
            );
        }
        Err(e) => {
            warn!("Prometheus recorder unavailable: {}", e);
        }
    }

    app.layer(cors).with_state(state)
}

/// Build the application router from configuration
pub fn build_router(config: Config) -> Router {
    build_router_with_state(AppState::new(config))
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);

    // Create shared application state
    let state = AppState::new(config);

    // Sweep abandoned sessions in the background
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            sessions.cleanup_expired();
            crate::metrics::set_active_sessions(sessions.session_count());
        }
    });

    let app = build_router_with_state(state);

    // Bind TCP listener
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("🚀 Server listening on http://{}", addr);
    info!("📺 Demo feed: http://{}/demo/feed", addr);
    info!(
        "🎬 Open a demo session: curl -X POST http://{}/playback/demo-content",
        addr
    );

    // Start serving
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
