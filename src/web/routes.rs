use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::page::HEADER_IMAGE_ROUTE;
use crate::core::adapter::InferenceAdapter;
use crate::core::artifact::LoadStrategy;
use crate::core::Classifier;

/// Application state shared across handlers
pub struct AppState<C: Classifier + 'static> {
    pub adapter: Arc<InferenceAdapter<C>>,
    pub model_path: String,
    pub load_strategy: LoadStrategy,
    pub header_image: PathBuf,
}

impl<C: Classifier + 'static> AppState<C> {
    pub fn new(adapter: InferenceAdapter<C>, model_path: impl Into<String>, load_strategy: LoadStrategy) -> Self {
        Self {
            adapter: Arc::new(adapter),
            model_path: model_path.into(),
            load_strategy,
            header_image: PathBuf::from("./photo/coffeeheader.jpg"),
        }
    }

    pub fn with_header_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.header_image = path.into();
        self
    }
}

/// Create the main application router
///
/// # Routes
///
/// - `GET /` - The form, with no result
/// - `POST /` - Form submission; re-renders the form with the verdict
/// - `POST /api/predict` - JSON prediction
/// - `GET /health` - Health check with model details
/// - `GET /photo/coffeeheader.jpg` - Header image
pub fn create_router<C: Classifier + 'static>(state: Arc<AppState<C>>) -> Router {
    let header_image = ServeFile::new(&state.header_image);

    Router::new()
        .route("/", get(handlers::show_form).post(handlers::submit_form::<C>))
        .route("/api/predict", post(handlers::api_predict::<C>))
        .route("/health", get(handlers::health::<C>))
        .route_service(HEADER_IMAGE_ROUTE, header_image)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
