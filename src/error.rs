//! Error taxonomy for loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Startup artifact failures. Never fatal by themselves; the caller decides.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read model metadata from {path}: {source}")]
    MetadataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed model metadata in {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid model metadata: {reason}")]
    InvalidMetadata { reason: String },

    #[error("model file not found: {path}")]
    ModelMissing { path: PathBuf },

    #[error("failed to load model from {path}: {cause:#}")]
    ModelLoad { path: PathBuf, cause: anyhow::Error },
}

/// A read was attempted before a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotLoadedError {
    #[error("Model not loaded")]
    Model,

    #[error("Model metadata not loaded")]
    Metadata,
}

/// Failures of a single prediction
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    ModelNotLoaded(#[from] NotLoadedError),

    /// Metadata names a feature the request schema does not carry
    #[error("feature '{feature}' required by the model is not part of the request schema")]
    FeatureMismatch { feature: String },

    #[error("model inference failed: {cause:#}")]
    Inference { cause: anyhow::Error },
}

impl PredictionError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::ModelNotLoaded(_) => "not_loaded",
            PredictionError::FeatureMismatch { .. } => "feature_mismatch",
            PredictionError::Inference { .. } => "inference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_loaded_messages() {
        assert_eq!(NotLoadedError::Model.to_string(), "Model not loaded");
        assert_eq!(
            NotLoadedError::Metadata.to_string(),
            "Model metadata not loaded"
        );
    }

    #[test]
    fn test_prediction_error_kinds() {
        let err: PredictionError = NotLoadedError::Model.into();
        assert_eq!(err.kind(), "not_loaded");
        assert_eq!(err.to_string(), "Model not loaded");

        let err = PredictionError::FeatureMismatch {
            feature: "sqft_lot".to_string(),
        };
        assert_eq!(err.kind(), "feature_mismatch");
        assert!(err.to_string().contains("sqft_lot"));

        let err = PredictionError::Inference {
            cause: anyhow::anyhow!("shape mismatch"),
        };
        assert_eq!(err.kind(), "inference");
        assert_eq!(err.to_string(), "model inference failed: shape mismatch");
    }
}
