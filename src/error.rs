use std::collections::BTreeMap;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Validation messages keyed by the offending payload field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Error taxonomy for the API surface. Every variant renders as the uniform
/// `{ok, code, message, errors?}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Option<FieldErrors>,
    },

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Request body is too large")]
    ContentTooLarge,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Field-level validation failure.
    pub fn validation(errors: FieldErrors) -> Self {
        Self::BadRequest {
            message: "Wrong data".into(),
            errors: Some(errors),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::ContentTooLarge => "CONTENT_TOO_LARGE",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::ContentTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Bodies rejected by the `Json` extractor keep the envelope: oversized
    /// bodies map to `CONTENT_TOO_LARGE`, everything else to a 400.
    pub fn from_json_rejection(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::ContentTooLarge
        } else {
            Self::BadRequest {
                message: "Wrong data".into(),
                errors: None,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            // Internal detail is logged, never surfaced to the caller.
            Self::Internal(e) => {
                tracing::error!(error = ?e, "unhandled internal error");
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "ok": false,
            "code": code,
            "message": message,
        });
        if let Self::BadRequest {
            errors: Some(errors),
            ..
        } = &self
        {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(ApiError::RequestTimeout.code(), "REQUEST_TIMEOUT");
        assert_eq!(ApiError::ContentTooLarge.code(), "CONTENT_TOO_LARGE");
        assert_eq!(
            ApiError::NotFound("Banner does not exist".into()).code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).code(),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn statuses_match_variants() {
        assert_eq!(
            ApiError::validation(FieldErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::RequestTimeout.status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            ApiError::ContentTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
