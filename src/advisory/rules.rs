//! Weather → health risk rules.
//!
//! Rules are evaluated independently and in table order. Every rule that
//! fires appends its risk (if any) and its suggestions; the order of the
//! table is the display order.

use super::types::{HealthAdvisory, WeatherObservation};

/// Shown when no rule fires.
pub const NO_RISK_MESSAGE: &str = "No specific weather-related health risks are predicted for \
     today. Maintain general wellness: stay hydrated, eat balanced meals, and stay active.";

pub const RISK_HIGH_UV: &str = "High UV Exposure";
pub const RISK_HEATSTROKE: &str = "Heatstroke & Dehydration";
pub const RISK_MODERATE_HEAT: &str = "Moderate Heat Discomfort";
pub const RISK_WATERBORNE: &str = "Water-borne & Vector-borne Diseases";
pub const RISK_RAIN_COLD_FLU: &str = "Cold & Flu from Rain";
pub const RISK_COLD_WEATHER: &str = "Cold-Weather Ailments";
pub const RISK_POLLEN: &str = "Pollen & Allergy Flare-ups";

pub const SUN_PROTECTION_REMINDER: &str =
    "Even with moderate UV, strong heat makes sun protection important: wear a hat and use sunscreen.";

/// A single advisory rule.
pub struct AdvisoryRule {
    pub name: &'static str,
    pub applies: fn(&WeatherObservation) -> bool,
    pub risk: Option<&'static str>,
    pub suggestions: &'static [&'static str],
}

pub const RULES: &[AdvisoryRule] = &[
    AdvisoryRule {
        name: "high_uv",
        applies: high_uv,
        risk: Some(RISK_HIGH_UV),
        suggestions: &[
            "Limit direct sun exposure between 10 AM and 4 PM.",
            "Apply a broad-spectrum sunscreen with SPF 30 or higher.",
            "Wear sunglasses, a wide-brimmed hat, and protective clothing.",
        ],
    },
    AdvisoryRule {
        name: "extreme_heat",
        applies: extreme_heat,
        risk: Some(RISK_HEATSTROKE),
        suggestions: &[
            "Drink plenty of water throughout the day, even if you are not thirsty.",
            "Avoid strenuous outdoor activity during the hottest hours.",
            "Wear light-colored, loose-fitting clothing.",
        ],
    },
    AdvisoryRule {
        name: "extreme_heat_sun_reminder",
        applies: extreme_heat_without_high_uv,
        risk: None,
        suggestions: &[SUN_PROTECTION_REMINDER],
    },
    AdvisoryRule {
        name: "moderate_heat",
        applies: moderate_heat,
        risk: Some(RISK_MODERATE_HEAT),
        suggestions: &[
            "Stay hydrated and keep a water bottle with you.",
            "Take regular breaks in the shade when outdoors.",
        ],
    },
    AdvisoryRule {
        name: "heavy_rain",
        applies: heavy_rain,
        risk: Some(RISK_WATERBORNE),
        suggestions: &[
            "Drink only boiled or purified water.",
            "Avoid wading through or standing near stagnant water.",
            "Use mosquito repellent and clear standing water around your home.",
        ],
    },
    AdvisoryRule {
        name: "light_rain",
        applies: light_rain,
        risk: Some(RISK_RAIN_COLD_FLU),
        suggestions: &[
            "Stay warm and dry; change out of wet clothes promptly.",
            "Wash your hands frequently to limit the spread of colds and flu.",
        ],
    },
    AdvisoryRule {
        name: "cold",
        applies: cold,
        risk: Some(RISK_COLD_WEATHER),
        suggestions: &[
            "Dress in warm layers when going outside.",
            "Watch for flu symptoms and consider a seasonal flu vaccine.",
            "Keep your living space adequately heated.",
        ],
    },
    AdvisoryRule {
        name: "pollen",
        applies: pollen,
        risk: Some(RISK_POLLEN),
        suggestions: &[
            "Check the local pollen forecast before outdoor plans.",
            "Keep windows closed on high-pollen days and have allergy medication at hand.",
        ],
    },
];

fn high_uv(obs: &WeatherObservation) -> bool {
    obs.uv().is_some_and(|uv| uv > 7.0)
}

fn extreme_heat(obs: &WeatherObservation) -> bool {
    obs.max_temp().is_some_and(|t| t > 35.0)
}

// Unknown UV counts as "not high".
fn extreme_heat_without_high_uv(obs: &WeatherObservation) -> bool {
    extreme_heat(obs) && !high_uv(obs)
}

fn moderate_heat(obs: &WeatherObservation) -> bool {
    obs.max_temp().is_some_and(|t| t > 30.0 && t <= 35.0)
}

fn heavy_rain(obs: &WeatherObservation) -> bool {
    obs.precipitation().is_some_and(|p| p > 5.0)
}

fn light_rain(obs: &WeatherObservation) -> bool {
    obs.precipitation().is_some_and(|p| p > 0.5 && p <= 5.0)
}

fn cold(obs: &WeatherObservation) -> bool {
    obs.max_temp().is_some_and(|t| t < 15.0)
}

fn pollen(obs: &WeatherObservation) -> bool {
    obs.uv().is_some_and(|uv| uv > 5.0)
        && obs.max_temp().is_some_and(|t| t < 25.0)
        && obs.precipitation().map_or(true, |p| p < 1.0)
}

/// Predict health risks for one weather observation.
///
/// Total over all inputs: unknown fields disable the rules that need them.
pub fn predict(observation: &WeatherObservation) -> HealthAdvisory {
    let mut risks = Vec::new();
    let mut suggestions = Vec::new();

    for rule in RULES.iter().filter(|rule| (rule.applies)(observation)) {
        tracing::debug!(rule = rule.name, "Advisory rule fired");
        if let Some(risk) = rule.risk {
            risks.push(risk.to_string());
        }
        suggestions.extend(rule.suggestions.iter().map(|s| s.to_string()));
    }

    let fallback_message = if risks.is_empty() && suggestions.is_empty() {
        Some(NO_RISK_MESSAGE.to_string())
    } else {
        None
    };

    HealthAdvisory {
        risks,
        suggestions,
        fallback_message,
    }
}
