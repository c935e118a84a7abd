//! HTTP surface: routes, handlers and error mapping

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::metrics::ServiceMetrics;
use crate::service::PredictionService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(service: PredictionService, metrics: Arc<ServiceMetrics>) -> Self {
        Self { service, metrics }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/model/info", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        .with_state(state)
}
