//! Structured AI endpoints, one per use case.
//!
//! Every handler answers with the normalized result type or a JSON error:
//! validation 400, content blocked 422, model failures 502.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::endpoints::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::{
    LabAnalysisResult, LabReportQuery, PrescriptionInsight, PrescriptionQuery, RemedyQuery,
    RemedyResult, SymptomAnalysisResult, SymptomQuery,
};

/// `POST /api/ai/symptoms`
pub async fn symptoms(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SymptomQuery>, JsonRejection>,
) -> Result<Json<SymptomAnalysisResult>, ApiError> {
    let Json(query) = payload?;
    let assistant = ctx.assistant.clone();
    run_blocking(move || assistant.analyze_symptoms(query))
        .await
        .map(Json)
}

/// `POST /api/ai/remedy`
pub async fn remedy(
    State(ctx): State<ApiContext>,
    payload: Result<Json<RemedyQuery>, JsonRejection>,
) -> Result<Json<RemedyResult>, ApiError> {
    let Json(query) = payload?;
    let assistant = ctx.assistant.clone();
    run_blocking(move || assistant.suggest_remedy(query))
        .await
        .map(Json)
}

/// `POST /api/ai/lab-report`
pub async fn lab_report(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LabReportQuery>, JsonRejection>,
) -> Result<Json<LabAnalysisResult>, ApiError> {
    let Json(query) = payload?;
    let assistant = ctx.assistant.clone();
    run_blocking(move || assistant.analyze_lab_report(query))
        .await
        .map(Json)
}

/// `POST /api/ai/prescription`
pub async fn prescription(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PrescriptionQuery>, JsonRejection>,
) -> Result<Json<PrescriptionInsight>, ApiError> {
    let Json(query) = payload?;
    let assistant = ctx.assistant.clone();
    run_blocking(move || assistant.analyze_prescription(query))
        .await
        .map(Json)
}
