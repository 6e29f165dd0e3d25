use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Budget applied to every route.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds the whole request; on expiry the caller gets the timeout envelope
/// instead of a hung connection.
pub async fn timeout(State(budget): State<Duration>, req: Request, next: Next) -> Response {
    match tokio::time::timeout(budget, next.run(req)).await {
        Ok(res) => res,
        Err(_) => ApiError::RequestTimeout.into_response(),
    }
}
