use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

pub const HANDLE_TIME_HEADER: &str = "x-handle-time";

/// Reports how long the inner service took in milliseconds, e.g.
/// `x-handle-time: 1.234ms`.
pub async fn handle_time(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let mut response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.3}ms")) {
        response.headers_mut().insert(HANDLE_TIME_HEADER, value);
    }
    response
}
