use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::services::metrics;

/// Per-request context, attached as a request extension so handlers can log
/// with the same request id the middleware reports.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// Assigns a request id, logs request start and finish with the execution
/// duration, and feeds the HTTP metrics. Failed requests (4xx/5xx) are
/// logged at error level.
pub async fn request_context(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    // Metrics are labeled by route template, not raw path.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    tracing::info!(%request_id, "{} {}", method, path);

    let start = Instant::now();
    let mut res = next.run(req).await;
    let elapsed = start.elapsed();
    let status = res.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        res.headers_mut().insert("x-request-id", value);
    }

    metrics::observe(method.as_str(), &route, status.as_u16(), elapsed.as_secs_f64());

    if status.is_client_error() || status.is_server_error() {
        tracing::error!(
            %request_id,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "{} {}",
            method,
            path
        );
    } else {
        tracing::info!(
            %request_id,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "{} {}",
            method,
            path
        );
    }

    res
}
