use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_status::SetStatus;
use url::Url;

use crate::{middleware as mw, routes, state::AppState};

/// Body limit applied to every route (20 MiB).
pub const BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Router + middleware stack for the banner API app.
pub fn api_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin(&state.config.base_url));

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route(
            "/api/banners",
            get(routes::banners::list_banners).post(routes::banners::create_banner),
        )
        .route(
            "/api/banners/{id}",
            get(routes::banners::get_banner).post(routes::banners::update_banner),
        )
        .route("/metrics", get(routes::metrics::metrics))
        .nest_service("/static", ServeDir::new("public"))
        .fallback_service(spa_bundle())
        .layer(axum::middleware::from_fn(mw::csrf::csrf))
        .layer(axum::middleware::from_fn_with_state(
            mw::timeout::REQUEST_TIMEOUT,
            mw::timeout::timeout,
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(mw::security::security_headers))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(axum::middleware::from_fn(mw::context::request_context))
        .with_state(state)
}

/// The intern app: upload stub + static assets, no database.
pub fn intern_app() -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/uploads", get(routes::uploads::status))
        .nest_service("/static", ServeDir::new("public"))
        .fallback_service(spa_bundle())
        .layer(axum::middleware::from_fn(mw::csrf::csrf))
        .layer(axum::middleware::from_fn_with_state(
            mw::timeout::REQUEST_TIMEOUT,
            mw::timeout::timeout,
        ))
        .layer(axum::middleware::from_fn(mw::security::security_headers))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(axum::middleware::from_fn(mw::context::request_context))
}

/// Pre-built web bundle with an index.html fallback for client routing.
fn spa_bundle() -> ServeDir<SetStatus<ServeFile>> {
    ServeDir::new("web/dist").not_found_service(ServeFile::new("web/dist/index.html"))
}

fn allow_origin(base_url: &Url) -> AllowOrigin {
    let origin = base_url.origin().ascii_serialization();
    AllowOrigin::predicate(move |value: &HeaderValue, _| {
        value.to_str().map(|v| v == origin).unwrap_or(false)
    })
}
