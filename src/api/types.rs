//! Shared types for the HTTP API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::advisory::{HealthAdvisory, WeatherObservation, WeatherSource};
use crate::auth::AuthProvider;
use crate::news::NewsSource;
use crate::pipeline::HealthAssistant;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
/// Collaborators sit behind traits so tests can swap them.
#[derive(Clone)]
pub struct ApiContext {
    pub assistant: HealthAssistant,
    pub news: Arc<dyn NewsSource + Send + Sync>,
    pub weather: Arc<dyn WeatherSource + Send + Sync>,
    pub auth: Arc<dyn AuthProvider + Send + Sync>,
}

impl ApiContext {
    pub fn new(
        assistant: HealthAssistant,
        news: Arc<dyn NewsSource + Send + Sync>,
        weather: Arc<dyn WeatherSource + Send + Sync>,
        auth: Arc<dyn AuthProvider + Send + Sync>,
    ) -> Self {
        Self {
            assistant,
            news,
            weather,
            auth,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Request / response shapes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastAdvisory {
    pub latitude: f64,
    pub longitude: f64,
    pub observation: WeatherObservation,
    pub advisory: HealthAdvisory,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsParams {
    pub category: Option<String>,
    pub country: Option<String>,
    pub page_size: Option<u32>,
}
