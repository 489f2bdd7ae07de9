use crate::core::adapter::InferenceAdapter;
use crate::core::artifact::LoadStrategy;
use crate::core::{Classifier, CoffeeQuery, Label, Verdict};
use crate::domain::model::Altitude;
use crate::utils::error::{CoffeeError, ErrorCategory, Result};
use crate::web::page::{render_page, FormView, Outcome};
use crate::web::routes::AppState;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub altitude: u32,
    pub region: String,
    pub processing: String,
    pub variety: String,
}

impl PredictRequest {
    fn into_query(self) -> Result<CoffeeQuery> {
        Ok(CoffeeQuery::new(
            Altitude::new(self.altitude)?,
            self.region.parse()?,
            self.processing.parse()?,
            self.variety.parse()?,
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub label: Label,
    pub verdict: Verdict,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_path: String,
    pub load_strategy: LoadStrategy,
}

pub fn status_for(err: &CoffeeError) -> StatusCode {
    match err.category() {
        ErrorCategory::Input => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Runs the synchronous adapter off the async executor.
async fn run_verdict<C: Classifier + 'static>(adapter: Arc<InferenceAdapter<C>>, query: CoffeeQuery) -> Result<Verdict> {
    tokio::task::spawn_blocking(move || adapter.verdict(&query))
        .await
        .map_err(|e| CoffeeError::IoError(std::io::Error::other(e)))?
}

/// Renders the page with `outcome`, falling back to a bare 500 if the template itself fails.
fn page_response(status: StatusCode, view: &FormView, outcome: Option<&Outcome>) -> Response {
    match render_page(view, outcome) {
        Ok(page) => (status, Html(page)).into_response(),
        Err(e) => {
            tracing::error!("❌ {} (Category: {:?})", e, e.category());
            (StatusCode::INTERNAL_SERVER_ERROR, e.user_friendly_message()).into_response()
        }
    }
}

fn error_page(view: &FormView, err: &CoffeeError) -> Response {
    page_response(status_for(err), view, Some(&Outcome::Error(err.user_friendly_message())))
}

fn error_json(err: &CoffeeError) -> Response {
    let body = ErrorResponse {
        error: err.user_friendly_message(),
        category: format!("{:?}", err.category()).to_lowercase(),
    };
    (status_for(err), Json(body)).into_response()
}

pub async fn show_form() -> Response {
    page_response(StatusCode::OK, &FormView::default(), None)
}

pub async fn submit_form<C: Classifier + 'static>(
    State(state): State<Arc<AppState<C>>>,
    form: std::result::Result<Form<FormView>, FormRejection>,
) -> Response {
    let view = match form {
        Ok(Form(view)) => view,
        Err(rejection) => {
            let e = CoffeeError::validation("form", rejection.body_text());
            tracing::warn!("Rejected form submission: {}", e);
            return error_page(&FormView::default(), &e);
        }
    };

    let query = match CoffeeQuery::parse(&view.altitude, &view.region, &view.processing, &view.variety) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Rejected form submission: {}", e);
            return error_page(&view, &e);
        }
    };

    match run_verdict(state.adapter.clone(), query).await {
        Ok(verdict) => {
            tracing::info!("Verdict for {} m / {} / {}: {:?}", query.altitude, query.region, query.variety, verdict);
            page_response(StatusCode::OK, &view, Some(&Outcome::Verdict(verdict)))
        }
        Err(e) => {
            tracing::error!("❌ Prediction failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            error_page(&view, &e)
        }
    }
}

pub async fn api_predict<C: Classifier + 'static>(
    State(state): State<Arc<AppState<C>>>,
    request: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let query = match request {
        Ok(Json(request)) => request.into_query(),
        Err(rejection) => Err(CoffeeError::validation("request body", rejection.body_text())),
    };

    let result = match query {
        Ok(query) => run_verdict(state.adapter.clone(), query).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(verdict) => Json(PredictResponse {
            label: verdict.label(),
            verdict,
            message: verdict.message().to_string(),
        })
        .into_response(),
        Err(e) => {
            if e.category() != ErrorCategory::Input {
                tracing::error!("❌ Prediction failed: {}", e);
            }
            error_json(&e)
        }
    }
}

pub async fn health<C: Classifier + 'static>(State(state): State<Arc<AppState<C>>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_path: state.model_path.clone(),
        load_strategy: state.load_strategy,
    })
}
