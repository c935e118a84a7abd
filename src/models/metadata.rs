//! Model metadata sidecar and the feature order derived from it

use crate::error::LoadError;
use crate::types::record::Feature;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Descriptive document shipped next to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub version: String,
    /// Canonical order of the model's input vector
    pub features: Vec<String>,
    pub training_date: String,
    pub rmse: f64,
    pub description: String,
}

/// One position of the model input vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSlot {
    Known(Feature),
    /// Name the request schema does not carry
    Unknown(String),
}

/// Lookup table from model input position to record attribute.
///
/// Built once per load so requests never re-derive the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOrder {
    slots: Vec<FeatureSlot>,
}

impl FeatureOrder {
    /// Resolve metadata feature names against the schema.
    ///
    /// Empty or duplicated lists are rejected. Unknown names are kept so that
    /// prediction can report them.
    pub fn from_metadata(metadata: &ModelMetadata) -> Result<Self, LoadError> {
        if metadata.features.is_empty() {
            return Err(LoadError::InvalidMetadata {
                reason: "feature list is empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(metadata.features.len());
        for name in &metadata.features {
            if !seen.insert(name.as_str()) {
                return Err(LoadError::InvalidMetadata {
                    reason: format!("feature '{}' is listed more than once", name),
                });
            }
            match Feature::from_name(name) {
                Some(feature) => slots.push(FeatureSlot::Known(feature)),
                None => {
                    warn!(feature = %name, "Model metadata names a feature outside the request schema");
                    slots.push(FeatureSlot::Unknown(name.clone()));
                }
            }
        }

        let order = Self { slots };
        let missing = order.unused_features();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Request features not consumed by the model");
        }
        Ok(order)
    }

    pub fn slots(&self) -> &[FeatureSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Schema features that never appear in the model input
    pub fn unused_features(&self) -> Vec<&'static str> {
        Feature::ALL
            .iter()
            .filter(|f| !self.slots.contains(&FeatureSlot::Known(**f)))
            .map(|f| f.name())
            .collect()
    }
}
