//! Feature extraction for house price model inference.
//!
//! The request schema's field order is not trusted; values are placed by
//! name according to the [`FeatureOrder`] resolved from model metadata.

use crate::error::PredictionError;
use crate::models::metadata::{FeatureOrder, FeatureSlot};
use crate::types::record::FeatureRecord;

/// Transforms validated records into model input vectors
pub struct FeatureExtractor<'a> {
    order: &'a FeatureOrder,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(order: &'a FeatureOrder) -> Self {
        Self { order }
    }

    /// Build the input vector in the model's canonical order.
    ///
    /// Fails with `FeatureMismatch` on the first metadata name the record
    /// does not carry.
    pub fn extract(&self, record: &FeatureRecord) -> Result<Vec<f32>, PredictionError> {
        self.order
            .slots()
            .iter()
            .map(|slot| match slot {
                FeatureSlot::Known(feature) => Ok(record.value(*feature)),
                FeatureSlot::Unknown(name) => Err(PredictionError::FeatureMismatch {
                    feature: name.clone(),
                }),
            })
            .collect()
    }

    /// Number of values produced per record
    pub fn feature_count(&self) -> usize {
        self.order.len()
    }
}
