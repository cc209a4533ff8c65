//! Daily weather lookup against the Open-Meteo forecast API.

use serde::Deserialize;

use super::types::WeatherObservation;
use super::WeatherError;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,uv_index_max";

/// Source of today's weather for a location (allows mocking).
pub trait WeatherSource {
    fn daily_observation(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherObservation, WeatherError>;
}

/// Reject coordinates outside the WGS84 range before any network call.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WeatherError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }
    Ok(())
}

/// HTTP client for `GET /v1/forecast`.
pub struct OpenMeteoClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, WeatherError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WeatherError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    daily: Option<DailyBlock>,
}

/// Open-Meteo returns one array per variable, `null` where a value is missing.
#[derive(Deserialize, Default)]
struct DailyBlock {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    uv_index_max: Vec<Option<f64>>,
}

fn first(values: &[Option<f64>]) -> Option<f64> {
    values.first().copied().flatten()
}

/// Map the first day of a forecast body into an observation.
fn parse_forecast(body: &str) -> Result<WeatherObservation, WeatherError> {
    let parsed: ForecastResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;
    let daily = parsed
        .daily
        .ok_or_else(|| WeatherError::MalformedResponse("missing daily block".into()))?;

    Ok(WeatherObservation {
        max_temp_c: first(&daily.temperature_2m_max),
        min_temp_c: first(&daily.temperature_2m_min),
        precipitation_mm: first(&daily.precipitation_sum),
        uv_index: first(&daily.uv_index_max),
    })
}

impl WeatherSource for OpenMeteoClient {
    fn daily_observation(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherObservation, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", "1".to_string()),
            ])
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    WeatherError::Http(format!("Request timed out after {}s", self.timeout_secs))
                } else {
                    WeatherError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| WeatherError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let observation = parse_forecast(&body)?;
        tracing::debug!(
            has_max_temp = observation.max_temp_c.is_some(),
            has_uv = observation.uv_index.is_some(),
            "Open-Meteo observation fetched"
        );
        Ok(observation)
    }
}
