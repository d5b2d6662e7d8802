//! Request logging.

use std::time::{Duration, Instant};

use axum::{body::Body, http::Request, middleware::Next, response::Response};

/// Engine searches routinely take seconds, so only flag requests well past that.
const SLOW_REQUEST: Duration = Duration::from_secs(30);

/// Logs method, path, status and duration for every request.
///
/// API calls are logged at info, static files at debug, and anything slower
/// than `SLOW_REQUEST` as a warning.
pub async fn timing_layer(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    let duration_ms = elapsed.as_millis();

    if elapsed > SLOW_REQUEST {
        tracing::warn!(%method, %path, status, duration_ms, "Slow request");
    } else if path.starts_with("/api/") {
        tracing::info!(%method, %path, status, duration_ms, "Request completed");
    } else {
        tracing::debug!(%method, %path, status, duration_ms, "Request completed");
    }

    response
}
