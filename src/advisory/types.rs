use serde::{Deserialize, Serialize};

/// One day of weather, as reported by the forecast collaborator.
///
/// Every field may be unknown. Rules that need an unknown field are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    #[serde(default)]
    pub max_temp_c: Option<f64>,
    #[serde(default)]
    pub min_temp_c: Option<f64>,
    #[serde(default)]
    pub precipitation_mm: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
}

impl WeatherObservation {
    /// Maximum temperature, `None` when unknown or not a finite number.
    pub fn max_temp(&self) -> Option<f64> {
        known(self.max_temp_c)
    }

    pub fn precipitation(&self) -> Option<f64> {
        known(self.precipitation_mm)
    }

    pub fn uv(&self) -> Option<f64> {
        known(self.uv_index)
    }
}

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Risks and mitigations predicted for one observation.
///
/// `fallback_message` is set exactly when both lists are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAdvisory {
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
}
