use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render all registered metrics in Prometheus text exposition format.
///
/// Everything recorded through the helpers in [`crate::metrics`]
/// (sessions, airings, impression writes, feed slots) lands here for
/// scraping.
pub async fn serve_metrics(handle: PrometheusHandle) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
        .into_response()
}
