//! Endpoint handlers

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::error::PredictionError;
use crate::models::metadata::ModelMetadata;
use crate::types::record::FeatureRecord;
use crate::types::response::{HealthStatus, PredictionResponse, RootInfo};
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::Json;
use std::time::Instant;
use tracing::{debug, error};

pub const SERVICE_NAME: &str = "House Price Prediction API";

/// Request body that passed schema validation
pub struct ValidatedRecord(pub FeatureRecord);

impl FromRequest<AppState> for ValidatedRecord {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(status = %e.status(), error = %e.body_text(), "Could not read request body");
            ApiError::Rejected {
                status: e.status(),
                detail: e.body_text(),
            }
        })?;

        FeatureRecord::from_json_slice(&body)
            .map(ValidatedRecord)
            .map_err(|errors| {
                debug!(errors = ?errors, "Rejected prediction request");
                state.metrics.record_failure("validation");
                ApiError::Validation(errors)
            })
    }
}

pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: vec![
            "/health - Check service health".to_string(),
            "/model/info - Get model information".to_string(),
            "/predict - Make price prediction".to_string(),
        ],
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.store().health())
}

pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelMetadata>, ApiError> {
    let metadata = state.service.store().get_metadata()?;
    Ok(Json(metadata))
}

pub async fn predict(
    State(state): State<AppState>,
    ValidatedRecord(record): ValidatedRecord,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();
    let service = state.service.clone();

    let result = tokio::task::spawn_blocking(move || service.predict(&record))
        .await
        .map_err(|e| {
            error!(error = %e, "Prediction task failed");
            state.metrics.record_failure("inference");
            ApiError::PredictionFailed(e.to_string())
        })?;

    match result {
        Ok(prediction) => {
            state.metrics.record_prediction(start.elapsed());
            Ok(Json(PredictionResponse::new(
                prediction.price.value(),
                prediction.model_version,
            )))
        }
        Err(e) => {
            state.metrics.record_failure(e.kind());
            if matches!(e, PredictionError::Inference { .. }) {
                error!(error = %e, "Prediction failed");
            }
            Err(e.into())
        }
    }
}
