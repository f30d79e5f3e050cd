//! Logging middleware
//!
//! One log line per HTTP request.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};

/// Log method, URI, status and latency of every request
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_millis();
    let status = response.status();
    if status.is_server_error() {
        warn!("{} {} -> {} ({} ms)", method, uri, status.as_u16(), elapsed_ms);
    } else {
        info!("{} {} -> {} ({} ms)", method, uri, status.as_u16(), elapsed_ms);
    }
    response
}
