//! Request handlers.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::Instrument;

use crate::http::server::AppState;
use crate::pages::headers::X_REQUEST_ID;

/// Liveness probe.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Prometheus text exposition.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        handle.render(),
    )
        .into_response()
}

/// Error page handler, mounted on every other path and method.
pub async fn error_page(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let span = tracing::info_span!("error_page", request_id = %request_id);

    let version = request.version();
    let (parts, _body) = request.into_parts();
    state
        .pages
        .respond(version, &parts.headers)
        .instrument(span)
        .await
}
