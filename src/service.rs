//! Prediction service: validated record in, rounded price out

use crate::error::{NotLoadedError, PredictionError};
use crate::feature_extractor::FeatureExtractor;
use crate::store::ModelStore;
use crate::types::record::FeatureRecord;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Predicted price, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Round to two decimals, ties to even. `None` unless the result is finite.
    pub fn from_raw(value: f64) -> Option<Self> {
        let rounded = (value * 100.0).round_ties_even() / 100.0;
        rounded.is_finite().then_some(Price(rounded))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Successful prediction together with the version that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub price: Price,
    pub model_version: String,
}

#[derive(Clone)]
pub struct PredictionService {
    store: Arc<ModelStore>,
}

impl PredictionService {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Run the loaded model on one record.
    ///
    /// Reads a single snapshot of the store so the metadata order and the
    /// model always belong to the same load.
    pub fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictionError> {
        let loaded = self
            .store
            .snapshot()
            .ok_or(PredictionError::ModelNotLoaded(NotLoadedError::Model))?;

        let features = FeatureExtractor::new(&loaded.order)
            .extract(record)
            .inspect_err(|e| {
                error!(
                    error = %e,
                    model_version = %loaded.metadata.version,
                    "Model metadata does not match the request schema"
                )
            })?;

        let raw = loaded
            .handle
            .predict(&features)
            .map_err(|cause| PredictionError::Inference { cause })?;
        let price = Price::from_raw(raw).ok_or_else(|| PredictionError::Inference {
            cause: anyhow::anyhow!("model returned a non-finite value: {}", raw),
        })?;
        debug!(
            model = %loaded.handle.name(),
            raw = raw,
            price = price.value(),
            "Prediction complete"
        );

        Ok(Prediction {
            price,
            model_version: loaded.metadata.version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metadata::tests::{full_metadata, metadata_with};
    use crate::models::regressor::tests::{FailingRegressor, LinearRegressor};
    use crate::models::regressor::Regressor;
    use crate::store::tests::empty_store;
    use crate::types::record::tests::example_record;

    struct ConstantRegressor(f64);

    impl Regressor for ConstantRegressor {
        fn name(&self) -> &str {
            "constant"
        }

        fn predict(&self, _features: &[f32]) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    fn service_with(handle: Arc<dyn Regressor>, features: &[&str]) -> PredictionService {
        let store = empty_store();
        store.install(handle, metadata_with(features)).unwrap();
        PredictionService::new(Arc::new(store))
    }

    #[test]
    fn test_price_rounding() {
        let cents = |raw: f64| Price::from_raw(raw).unwrap().value();
        assert_eq!(cents(123456.789), 123456.79);
        assert_eq!(cents(99.994), 99.99);
        assert_eq!(cents(-0.001), -0.0);
        assert_eq!(cents(250000.0), 250000.0);
    }

    #[test]
    fn test_price_rounding_ties_to_even() {
        assert_eq!(Price::from_raw(0.125).unwrap().value(), 0.12);
        assert_eq!(Price::from_raw(0.375).unwrap().value(), 0.38);
        assert_eq!(Price::from_raw(-0.125).unwrap().value(), -0.12);
    }

    #[test]
    fn test_price_overflowing_cents_is_rejected() {
        assert!(Price::from_raw(1e307).is_none());
        assert!(Price::from_raw(f64::INFINITY).is_none());
        assert!(Price::from_raw(f64::NAN).is_none());
        assert!(Price::from_raw(1e300).is_some());
    }

    #[test]
    fn test_not_loaded() {
        let service = PredictionService::new(Arc::new(empty_store()));
        let err = service.predict(&example_record()).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ModelNotLoaded(NotLoadedError::Model)
        ));
    }

    #[test]
    fn test_predict_uses_metadata_order() {
        // price = 50000 + 100*area + 20000*beds
        let model = Arc::new(LinearRegressor::new(50000.0, vec![100.0, 20000.0]));
        let service = service_with(model.clone(), &["area", "beds"]);

        let prediction = service.predict(&example_record()).unwrap();
        assert_eq!(prediction.price.value(), 290000.0);
        assert_eq!(prediction.model_version, "1.0.0");
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let model = Arc::new(LinearRegressor::new(0.333, vec![0.1; 13]));
        let store = empty_store();
        store.install(model, full_metadata()).unwrap();
        let service = PredictionService::new(Arc::new(store));

        let first = service.predict(&example_record()).unwrap();
        let second = service.predict(&example_record()).unwrap();
        assert_eq!(first, second);
        let cents = first.price.value() * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6);
    }

    #[test]
    fn test_feature_mismatch_skips_model() {
        let model = Arc::new(LinearRegressor::new(0.0, vec![1.0, 1.0]));
        let service = service_with(model.clone(), &["beds", "sqft_lot"]);

        let err = service.predict(&example_record()).unwrap_err();
        assert!(matches!(err, PredictionError::FeatureMismatch { ref feature } if feature == "sqft_lot"));
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_inference_failure_preserves_cause() {
        let service = service_with(Arc::new(FailingRegressor), &["beds"]);
        let err = service.predict(&example_record()).unwrap_err();
        assert_eq!(err.kind(), "inference");
        assert!(err.to_string().contains("tensor shape mismatch"));
    }

    #[test]
    fn test_non_finite_output_is_inference_error() {
        let service = service_with(Arc::new(ConstantRegressor(f64::NAN)), &["beds"]);
        let err = service.predict(&example_record()).unwrap_err();
        assert!(matches!(err, PredictionError::Inference { .. }));
    }

    #[test]
    fn test_huge_output_is_inference_error() {
        let service = service_with(Arc::new(ConstantRegressor(1e307)), &["beds"]);
        let err = service.predict(&example_record()).unwrap_err();
        assert!(matches!(err, PredictionError::Inference { .. }));
        assert!(err.to_string().contains("non-finite"));
    }
}
