use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

lazy_static! {
    pub static ref HTTP_REQUESTS: CounterVec = register_counter_vec!(
        "api_http_requests_total",
        "HTTP requests by method, path and status",
        &["method", "path", "status"]
    )
    .unwrap();
    pub static ref HTTP_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "api_http_request_duration_seconds",
        "Request execution duration by method and path",
        &["method", "path"]
    )
    .unwrap();
}

/// Record one finished request. Called from the request-context middleware.
pub fn observe(method: &str, path: &str, status: u16, seconds: f64) {
    HTTP_REQUESTS
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method, path])
        .observe(seconds);
}
