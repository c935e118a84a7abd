//! Response envelopes returned by the HTTP surface

use crate::types::record::FieldError;
use serde::{Deserialize, Serialize};

/// Currency every prediction is expressed in
pub const CURRENCY: &str = "USD";

/// `GET /` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Service health, as reported by the model store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub metadata_loaded: bool,
    pub message: String,
}

impl HealthStatus {
    pub fn from_flags(model_loaded: bool, metadata_loaded: bool) -> Self {
        if model_loaded && metadata_loaded {
            Self {
                status: "healthy".to_string(),
                model_loaded,
                metadata_loaded,
                message: "Model and metadata are loaded.".to_string(),
            }
        } else {
            Self {
                status: "unhealthy".to_string(),
                model_loaded,
                metadata_loaded,
                message: "Model or metadata not loaded.".to_string(),
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `POST /predict` success body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
    pub currency: String,
    pub model_version: String,
}

impl PredictionResponse {
    pub fn new(predicted_price: f64, model_version: impl Into<String>) -> Self {
        Self {
            predicted_price,
            currency: CURRENCY.to_string(),
            model_version: model_version.into(),
        }
    }
}

/// Error body with a single message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Error body listing every rejected field
#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorBody {
    pub detail: Vec<FieldError>,
}
