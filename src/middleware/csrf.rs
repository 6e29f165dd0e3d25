use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::ApiError;

// Content types a cross-site <form> can produce.
const FORM_CONTENT_TYPES: [&str; 3] = [
    "application/x-www-form-urlencoded",
    "multipart/form-data",
    "text/plain",
];

fn is_form_like(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let essence = ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase();
            FORM_CONTENT_TYPES.contains(&essence.as_str())
        }
    }
}

fn origin_authority(origin: &str) -> Option<String> {
    let url = Url::parse(origin).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Same-origin check for requests a cross-site form could submit: unsafe
/// methods with a form-like (or missing) content type must carry an
/// `Origin` header matching the request's own `Host`.
pub async fn csrf(req: Request, next: Next) -> Response {
    let method = req.method();
    if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        return next.run(req).await;
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if !is_form_like(content_type) {
        return next.run(req).await;
    }

    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .and_then(origin_authority);
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match (origin.as_deref(), host.as_deref()) {
        (Some(origin), Some(host)) if origin == host => next.run(req).await,
        _ => ApiError::Forbidden.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_content_types_are_flagged() {
        assert!(is_form_like(None));
        assert!(is_form_like(Some("text/plain")));
        assert!(is_form_like(Some(
            "multipart/form-data; boundary=----x"
        )));
        assert!(is_form_like(Some("APPLICATION/X-WWW-FORM-URLENCODED")));
        assert!(!is_form_like(Some("application/json")));
        assert!(!is_form_like(Some("application/json; charset=utf-8")));
    }

    #[test]
    fn origin_authority_includes_explicit_port() {
        assert_eq!(
            origin_authority("http://localhost:3000").as_deref(),
            Some("localhost:3000")
        );
        assert_eq!(
            origin_authority("https://example.com").as_deref(),
            Some("example.com")
        );
        assert_eq!(origin_authority("null"), None);
    }
}
