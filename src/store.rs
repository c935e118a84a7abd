//! Model store: owns the loaded model, its metadata and their lifecycle.
//!
//! The handle and metadata are published together as one [`LoadedModel`]
//! snapshot, so a reader can never pair metadata from one load with a model
//! from another.

use crate::config::ModelsConfig;
use crate::error::{LoadError, NotLoadedError};
use crate::models::loader::ModelLoader;
use crate::models::metadata::{FeatureOrder, ModelMetadata};
use crate::models::regressor::Regressor;
use crate::types::response::HealthStatus;
use std::sync::{Arc, RwLock};
use tracing::{error, info};

/// Everything a prediction needs, loaded together
pub struct LoadedModel {
    pub handle: Arc<dyn Regressor>,
    pub metadata: ModelMetadata,
    pub order: FeatureOrder,
}

pub struct ModelStore {
    loader: ModelLoader,
    state: RwLock<Option<Arc<LoadedModel>>>,
}

impl ModelStore {
    /// Create an empty store; nothing is read until [`ModelStore::load`]
    pub fn new(config: &ModelsConfig) -> Self {
        Self {
            loader: ModelLoader::new(config),
            state: RwLock::new(None),
        }
    }

    /// Read both artifacts from the configured locations and publish them.
    ///
    /// On failure the previous state is left untouched.
    pub fn load(&self) -> Result<(), LoadError> {
        let result = self.read_artifacts();
        match result {
            Ok((handle, metadata)) => self.install(handle, metadata),
            Err(e) => {
                error!(
                    model = %self.loader.model_path().display(),
                    metadata = %self.loader.metadata_path().display(),
                    error = %e,
                    "Failed to load model or metadata"
                );
                Err(e)
            }
        }
    }

    fn read_artifacts(&self) -> Result<(Arc<dyn Regressor>, ModelMetadata), LoadError> {
        let metadata = self.loader.load_metadata()?;
        let handle: Arc<dyn Regressor> = Arc::new(self.loader.load_model()?);
        Ok((handle, metadata))
    }

    /// Publish an already-constructed model and metadata pair
    pub fn install(
        &self,
        handle: Arc<dyn Regressor>,
        metadata: ModelMetadata,
    ) -> Result<(), LoadError> {
        let order = FeatureOrder::from_metadata(&metadata)?;
        let loaded = Arc::new(LoadedModel {
            handle,
            metadata,
            order,
        });

        info!(
            model = %loaded.handle.name(),
            version = %loaded.metadata.version,
            features = loaded.order.len(),
            "Model and metadata loaded successfully"
        );

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = Some(loaded);
        Ok(())
    }

    /// Current snapshot, if a load has succeeded
    pub fn snapshot(&self) -> Option<Arc<LoadedModel>> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get_metadata(&self) -> Result<ModelMetadata, NotLoadedError> {
        self.snapshot()
            .map(|loaded| loaded.metadata.clone())
            .ok_or(NotLoadedError::Metadata)
    }

    pub fn get_handle(&self) -> Result<Arc<dyn Regressor>, NotLoadedError> {
        self.snapshot()
            .map(|loaded| loaded.handle.clone())
            .ok_or(NotLoadedError::Model)
    }

    /// Never fails
    pub fn health(&self) -> HealthStatus {
        let loaded = self.snapshot().is_some();
        HealthStatus::from_flags(loaded, loaded)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::metadata::tests::{full_metadata, metadata_with};
    use crate::models::regressor::tests::LinearRegressor;

    /// Store pointing at paths that do not exist
    pub(crate) fn empty_store() -> ModelStore {
        ModelStore::new(&ModelsConfig {
            model_path: "/nonexistent/model.onnx".to_string(),
            metadata_path: "/nonexistent/model_metadata.json".to_string(),
            onnx_threads: 1,
        })
    }

    #[test]
    fn test_unloaded_store() {
        let store = empty_store();
        assert_eq!(store.get_metadata().unwrap_err(), NotLoadedError::Metadata);
        assert!(matches!(store.get_handle(), Err(NotLoadedError::Model)));

        let health = store.health();
        assert_eq!(health.status, "unhealthy");
        assert!(!health.model_loaded);
        assert!(!health.metadata_loaded);
    }

    #[test]
    fn test_failed_load_stays_unhealthy() {
        let store = empty_store();
        assert!(matches!(store.load(), Err(LoadError::MetadataRead { .. })));
        assert!(!store.health().is_healthy());
    }

    #[test]
    fn test_install_makes_healthy() {
        let store = empty_store();
        store
            .install(Arc::new(LinearRegressor::new(0.0, vec![1.0; 13])), full_metadata())
            .unwrap();

        let health = store.health();
        assert_eq!(health.status, "healthy");
        assert!(health.model_loaded && health.metadata_loaded);
        assert_eq!(store.get_metadata().unwrap(), full_metadata());
        assert_eq!(store.get_handle().unwrap().name(), "linear");
    }

    #[test]
    fn test_failed_load_keeps_previous_state() {
        let store = empty_store();
        store
            .install(Arc::new(LinearRegressor::new(0.0, vec![1.0; 13])), full_metadata())
            .unwrap();

        assert!(store.load().is_err());
        assert!(store.health().is_healthy());
        assert_eq!(store.get_metadata().unwrap().version, "1.0.0");
    }

    #[test]
    fn test_invalid_metadata_rejected_on_install() {
        let store = empty_store();
        let result = store.install(
            Arc::new(LinearRegressor::new(0.0, vec![])),
            metadata_with(&[]),
        );
        assert!(matches!(result, Err(LoadError::InvalidMetadata { .. })));
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn test_reinstall_replaces_pair() {
        let store = empty_store();
        store
            .install(Arc::new(LinearRegressor::new(0.0, vec![1.0; 13])), full_metadata())
            .unwrap();
        let first = store.snapshot().unwrap();

        let mut next = metadata_with(&["beds"]);
        next.version = "2.0.0".to_string();
        store
            .install(Arc::new(LinearRegressor::new(5.0, vec![1.0])), next)
            .unwrap();

        let second = store.snapshot().unwrap();
        assert_eq!(first.metadata.version, "1.0.0");
        assert_eq!(first.order.len(), 13);
        assert_eq!(second.metadata.version, "2.0.0");
        assert_eq!(second.order.len(), 1);
    }
}
