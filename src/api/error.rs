//! Mapping of service errors onto HTTP responses

use crate::error::{NotLoadedError, PredictionError};
use crate::types::record::FieldError;
use crate::types::response::{ErrorBody, ValidationErrorBody};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Every failure the HTTP surface can return; always rendered as JSON
#[derive(Debug)]
pub enum ApiError {
    /// 422, one entry per rejected field
    Validation(Vec<FieldError>),
    /// 503
    NotLoaded(NotLoadedError),
    /// 500, `Prediction failed: <cause>`
    PredictionFailed(String),
    /// Body could not be read at all, e.g. 413 past the body limit
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PredictionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<NotLoadedError> for ApiError {
    fn from(err: NotLoadedError) -> Self {
        ApiError::NotLoaded(err)
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::ModelNotLoaded(e) => ApiError::NotLoaded(e),
            other => ApiError::PredictionFailed(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(detail) => {
                (status, Json(ValidationErrorBody { detail })).into_response()
            }
            ApiError::NotLoaded(e) => (
                status,
                Json(ErrorBody {
                    detail: e.to_string(),
                }),
            )
                .into_response(),
            ApiError::PredictionFailed(cause) => (
                status,
                Json(ErrorBody {
                    detail: format!("Prediction failed: {}", cause),
                }),
            )
                .into_response(),
            ApiError::Rejected { detail, .. } => {
                (status, Json(ErrorBody { detail })).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(NotLoadedError::Metadata).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PredictionError::ModelNotLoaded(NotLoadedError::Model)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PredictionError::FeatureMismatch {
                feature: "x".to_string()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                detail: "length limit exceeded".to_string()
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
