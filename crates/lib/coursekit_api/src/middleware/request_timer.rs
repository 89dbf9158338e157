//! Per-request timing log.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::info;

/// Logs method, path, status and elapsed milliseconds once the response is ready.
pub async fn request_timer(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = (elapsed_ms * 100.0).round() / 100.0,
        "request completed"
    );
    response
}
