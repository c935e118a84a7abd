//! House Price Prediction Service Library
//!
//! Serves a pre-trained ONNX regression model over HTTP: health, model
//! metadata and single-record price prediction.

pub mod api;
pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod service;
pub mod store;
pub mod types;

pub use config::AppConfig;
pub use error::{LoadError, NotLoadedError, PredictionError};
pub use feature_extractor::FeatureExtractor;
pub use service::{Prediction, PredictionService, Price};
pub use store::ModelStore;
pub use types::{record::FeatureRecord, response::HealthStatus};
