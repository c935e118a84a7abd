//! ML model components

pub mod loader;
pub mod metadata;
pub mod regressor;

pub use loader::ModelLoader;
pub use metadata::{FeatureOrder, FeatureSlot, ModelMetadata};
pub use regressor::{OnnxRegressor, Regressor};
