//! Type definitions for the house price service

pub mod record;
pub mod response;

pub use record::{Feature, FeatureRecord, FieldError};
pub use response::{HealthStatus, PredictionResponse, RootInfo};
