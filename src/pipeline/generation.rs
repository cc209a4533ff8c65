//! Per use case generation parameters: sampling temperature and
//! content-safety thresholds sent with every model call.

use serde::{Deserialize, Serialize};

use super::schema::{
    OutputSchema, CHATBOT_SCHEMA, LAB_ANALYSIS_SCHEMA, PRESCRIPTION_SCHEMA, REMEDY_SCHEMA,
    SYMPTOM_ANALYSIS_SCHEMA,
};

/// The AI-backed use cases served by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    SymptomAnalysis,
    RemedySuggestion,
    LabReportAnalysis,
    PrescriptionAnalysis,
    Chatbot,
}

impl UseCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymptomAnalysis => "symptom_analysis",
            Self::RemedySuggestion => "remedy_suggestion",
            Self::LabReportAnalysis => "lab_report_analysis",
            Self::PrescriptionAnalysis => "prescription_analysis",
            Self::Chatbot => "chatbot",
        }
    }

    pub fn schema(&self) -> &'static OutputSchema {
        match self {
            Self::SymptomAnalysis => &SYMPTOM_ANALYSIS_SCHEMA,
            Self::RemedySuggestion => &REMEDY_SCHEMA,
            Self::LabReportAnalysis => &LAB_ANALYSIS_SCHEMA,
            Self::PrescriptionAnalysis => &PRESCRIPTION_SCHEMA,
            Self::Chatbot => &CHATBOT_SCHEMA,
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        match self {
            Self::SymptomAnalysis => GenerationConfig::new(0.2, SafetyProfile::Strict),
            Self::RemedySuggestion => GenerationConfig::new(0.5, SafetyProfile::Remedy),
            Self::LabReportAnalysis => GenerationConfig::new(0.2, SafetyProfile::Strict),
            Self::PrescriptionAnalysis => GenerationConfig::new(0.1, SafetyProfile::Strict),
            Self::Chatbot => GenerationConfig::new(0.4, SafetyProfile::Strict),
        }
    }
}

impl std::fmt::Display for UseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SafetyProfile {
    /// Medium-and-above for every category.
    Strict,
    /// Strict, except dangerous content blocks only on high probability.
    Remedy,
}

impl SafetyProfile {
    fn settings(self) -> Vec<SafetySetting> {
        let dangerous = match self {
            SafetyProfile::Strict => BlockThreshold::BlockMediumAndAbove,
            SafetyProfile::Remedy => BlockThreshold::BlockOnlyHigh,
        };
        vec![
            SafetySetting {
                category: HarmCategory::Harassment,
                threshold: BlockThreshold::BlockMediumAndAbove,
            },
            SafetySetting {
                category: HarmCategory::HateSpeech,
                threshold: BlockThreshold::BlockMediumAndAbove,
            },
            SafetySetting {
                category: HarmCategory::SexuallyExplicit,
                threshold: BlockThreshold::BlockMediumAndAbove,
            },
            SafetySetting {
                category: HarmCategory::DangerousContent,
                threshold: dangerous,
            },
        ]
    }
}

/// Generation parameters for one model call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Sampling temperature (0.0-1.0). Medical answers stay low.
    pub temperature: f32,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerationConfig {
    fn new(temperature: f32, profile: SafetyProfile) -> Self {
        Self {
            temperature,
            safety_settings: profile.settings(),
        }
    }
}
