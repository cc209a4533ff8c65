//! Weather health advisory endpoints.
//!
//! - `POST /api/advisory`: advisory for a supplied observation
//! - `GET /api/advisory/forecast?lat&lon`: fetch today's weather, then advise

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;

use crate::advisory::{predict, HealthAdvisory, WeatherObservation};
use crate::api::endpoints::run_blocking;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ForecastAdvisory, ForecastParams};

pub async fn from_observation(
    payload: Result<Json<WeatherObservation>, JsonRejection>,
) -> Result<Json<HealthAdvisory>, ApiError> {
    let Json(observation) = payload?;
    Ok(Json(predict(&observation)))
}

pub async fn forecast(
    State(ctx): State<ApiContext>,
    params: Result<Query<ForecastParams>, QueryRejection>,
) -> Result<Json<ForecastAdvisory>, ApiError> {
    let Query(ForecastParams { lat, lon }) = params?;

    let weather = ctx.weather.clone();
    let observation = run_blocking(move || weather.daily_observation(lat, lon)).await?;
    let advisory = predict(&observation);

    tracing::info!(
        risks = advisory.risks.len(),
        suggestions = advisory.suggestions.len(),
        "Forecast advisory produced"
    );

    Ok(Json(ForecastAdvisory {
        latitude: lat,
        longitude: lon,
        observation,
        advisory,
    }))
}
