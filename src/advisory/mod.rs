//! Climate-driven health advisories.
//!
//! `rules::predict` is pure and total; `open_meteo` supplies the observation
//! when the caller only knows a location.

pub mod open_meteo;
pub mod rules;
pub mod types;

pub use open_meteo::{validate_coordinates, OpenMeteoClient, WeatherSource};
pub use rules::predict;
pub use types::{HealthAdvisory, WeatherObservation};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Weather service request failed: {0}")]
    Http(String),

    #[error("Weather service returned error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}
