use crate::analysis::AnalysisService;
use crate::error::AnalysisError;
use crate::models::{Report, TriggerAnalysisRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub struct AppState {
    pub analysis: AnalysisService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analysis/trigger", post(trigger_analysis))
        .route("/analysis/reports/by-work/:assignment_id", get(reports_by_work))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = match &self {
            AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
            AnalysisError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::ReportWrite { .. }
            | AnalysisError::Serialization(_)
            | AnalysisError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn trigger_analysis(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TriggerAnalysisRequest>,
) -> Result<Json<Report>, Response> {
    let submission_id = payload.submission_id.trim();
    if submission_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "submissionId cannot be empty" })),
        )
            .into_response());
    }

    match state.analysis.analyze(submission_id).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::warn!(submission_id, error = %e, "Analysis failed");
            Err(e.into_response())
        }
    }
}

async fn reports_by_work(
    State(state): State<Arc<AppState>>,
    Path(assignment_id): Path<String>,
) -> Result<Json<Vec<Report>>, AnalysisError> {
    let reports = state.analysis.reports_by_assignment(&assignment_id).await?;
    Ok(Json(reports))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
