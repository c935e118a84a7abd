//! Loader for the model artifact and its metadata sidecar

use crate::config::ModelsConfig;
use crate::error::LoadError;
use crate::models::metadata::ModelMetadata;
use crate::models::regressor::OnnxRegressor;
use anyhow::Context;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads artifacts from the configured locations
pub struct ModelLoader {
    model_path: PathBuf,
    metadata_path: PathBuf,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    pub fn new(config: &ModelsConfig) -> Self {
        Self {
            model_path: PathBuf::from(&config.model_path),
            metadata_path: PathBuf::from(&config.metadata_path),
            onnx_threads: config.onnx_threads.max(1),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Read and parse the metadata document
    pub fn load_metadata(&self) -> Result<ModelMetadata, LoadError> {
        let path = &self.metadata_path;
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::MetadataRead {
            path: path.clone(),
            source,
        })?;
        let metadata: ModelMetadata =
            serde_json::from_str(&raw).map_err(|source| LoadError::MetadataParse {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            version = %metadata.version,
            model_type = %metadata.model_type,
            features = metadata.features.len(),
            "Model metadata loaded"
        );
        Ok(metadata)
    }

    /// Build an ONNX Runtime session for the model file
    pub fn load_model(&self) -> Result<OnnxRegressor, LoadError> {
        let path = &self.model_path;
        if !path.exists() {
            return Err(LoadError::ModelMissing { path: path.clone() });
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = self
            .build_session(path)
            .map_err(|cause| LoadError::ModelLoad {
                path: path.clone(),
                cause,
            })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        let regressor = OnnxRegressor::new(name, session);

        info!(
            model = %regressor.name,
            input = %regressor.input_name,
            output = %regressor.output_name,
            "Model loaded successfully"
        );
        Ok(regressor)
    }

    fn build_session(&self, path: &Path) -> anyhow::Result<Session> {
        ort::init().commit()?;
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;
        Ok(session)
    }
}
