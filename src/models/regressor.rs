//! Regression model handle backed by ONNX Runtime

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Tensor;
use std::sync::Mutex;
use tracing::debug;

/// Anything that maps an ordered feature vector to one price
pub trait Regressor: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &str;

    /// Predict from features in the model's canonical order
    fn predict(&self, features: &[f32]) -> Result<f64>;
}

/// ONNX regression model
pub struct OnnxRegressor {
    /// Model name
    pub name: String,
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    pub input_name: String,
    /// Output name holding the prediction
    pub output_name: String,
}

impl OnnxRegressor {
    pub fn new(name: String, session: Session) -> Self {
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("variable") || o.name.contains("output"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "variable".to_string());

        Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        }
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f32]) -> Result<f64> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .with_context(|| format!("Session run failed for model {}", self.name))?;

        let output = outputs
            .get(self.output_name.as_str())
            .with_context(|| format!("Model produced no output named {}", self.output_name))?;

        let value = if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
            data.first().map(|&v| v as f64)
        } else {
            let (_, data) = output
                .try_extract_tensor::<f64>()
                .context("Model output is neither an f32 nor an f64 tensor")?;
            data.first().copied()
        };

        let value = value.context("Model output tensor is empty")?;
        debug!(model = %self.name, value = value, "Regressor output");
        Ok(value)
    }
}
