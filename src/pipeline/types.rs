use serde::{Deserialize, Serialize};

use super::generation::{GenerationConfig, UseCase};
use super::request::ImageData;
use super::schema::OutputSchema;
use super::AiError;

/// Result of free-text symptom analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysisResult {
    pub possible_conditions: Vec<PossibleCondition>,
    pub suggested_next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wellness_tip: Option<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleCondition {
    pub name: String,
    pub description: String,
}

/// A single home remedy suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemedyResult {
    pub name: String,
    pub category: String,
    pub description: String,
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub disclaimer: String,
}

/// Plain-language explanation of a lab report image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabAnalysisResult {
    pub summary: String,
    pub key_parameters: Vec<KeyParameter>,
    pub suggestions: Vec<String>,
    pub warnings_or_watchouts: Vec<String>,
    pub next_step: String,
    pub follow_up_questions: Vec<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyParameter {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ParameterStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    Normal,
    Low,
    High,
    Critical,
    Unknown,
}

impl ParameterStatus {
    /// Lenient parse. Unrecognized labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "normal" | "within range" | "in range" => Self::Normal,
            "low" | "below range" => Self::Low,
            "high" | "above range" | "elevated" => Self::High,
            "critical" | "critically high" | "critically low" => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

/// Medicines read off a prescription image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionInsight {
    pub medicines: Vec<MedicineInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineInsight {
    pub name: String,
    pub purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

/// Exactly one kind of chatbot answer. The `type` tag and the single
/// populated payload field cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatbotResult {
    Analysis {
        analysis: SymptomAnalysisResult,
    },
    Remedy {
        remedy: RemedyResult,
    },
    #[serde(rename_all = "camelCase")]
    PrescriptionInsight {
        prescription_insight: PrescriptionInsight,
    },
    #[serde(rename_all = "camelCase")]
    ReportInsight {
        report_insight_message: String,
    },
    Clarification {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        error_message: String,
    },
}

impl ChatbotResult {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Analysis { .. } => "analysis",
            Self::Remedy { .. } => "remedy",
            Self::PrescriptionInsight { .. } => "prescription_insight",
            Self::ReportInsight { .. } => "report_insight",
            Self::Clarification { .. } => "clarification",
            Self::Error { .. } => "error",
        }
    }
}

/// Everything one model call needs.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub use_case: UseCase,
    pub system: String,
    pub prompt: String,
    pub images: Vec<ImageData>,
    pub schema: &'static OutputSchema,
    pub config: GenerationConfig,
}

/// Structured-output model abstraction (allows mocking).
///
/// Returns the raw text of the first candidate; parsing happens downstream.
pub trait LlmClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError>;
}
