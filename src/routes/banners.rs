use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::{
    error::ApiError,
    middleware::context::RequestContext,
    models::banner::{parse_banner_id, BannerResponse, BannersResponse, NewBanner},
    services::banners::BannerService,
    state::AppState,
};

/// GET /api/banners — the current active banner (empty list when none).
pub async fn list_banners(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<BannersResponse>, ApiError> {
    let banners = BannerService::list_active(&state.db).await.map_err(|e| {
        tracing::error!(
            request_id = %ctx.request_id,
            error = ?e,
            "Something went wrong while listing banners"
        );
        ApiError::Internal(e)
    })?;

    Ok(Json(BannersResponse::new(banners)))
}

/// GET /api/banners/{id} — 200 either way; the `banner` key is simply
/// missing when no row matches.
pub async fn get_banner(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Result<Json<BannerResponse>, ApiError> {
    let id = parse_banner_id(&id).map_err(ApiError::validation)?;

    let banner = BannerService::get(&state.db, &id).await.map_err(|e| {
        tracing::error!(
            request_id = %ctx.request_id,
            error = ?e,
            "Something went wrong while fetching banner"
        );
        ApiError::Internal(e)
    })?;

    Ok(Json(BannerResponse::new(banner)))
}

/// POST /api/banners
pub async fn create_banner(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BannerResponse>), ApiError> {
    let Json(payload) = payload.map_err(ApiError::from_json_rejection)?;
    let payload = NewBanner::parse(&payload).map_err(ApiError::validation)?;

    let banner = BannerService::create(&state.db, &payload)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %ctx.request_id,
                error = ?e,
                "Something went wrong while creating banner"
            );
            ApiError::Internal(e)
        })?;

    Ok((StatusCode::CREATED, Json(BannerResponse::new(Some(banner)))))
}

/// POST /api/banners/{id} — existence is checked before the write
/// transaction; an unknown id is an explicit not-found.
pub async fn update_banner(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BannerResponse>, ApiError> {
    let id = parse_banner_id(&id).map_err(ApiError::validation)?;
    let Json(payload) = payload.map_err(ApiError::from_json_rejection)?;
    let payload = NewBanner::parse(&payload).map_err(ApiError::validation)?;

    let exists = BannerService::exists(&state.db, &id).await.map_err(|e| {
        tracing::error!(
            request_id = %ctx.request_id,
            error = ?e,
            "Something went wrong while checking banner"
        );
        ApiError::Internal(e)
    })?;
    if !exists {
        return Err(ApiError::NotFound("Banner does not exist".into()));
    }

    let banner = BannerService::update(&state.db, &id, &payload)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %ctx.request_id,
                error = ?e,
                "Something went wrong while updating banner"
            );
            ApiError::Internal(e)
        })?;

    Ok(Json(BannerResponse::new(Some(banner))))
}
