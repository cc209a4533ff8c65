pub mod chatbot;
pub mod gemini;
pub mod generation;
pub mod normalize;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod request;
pub mod sanitize;
pub mod schema;
pub mod types;

pub use chatbot::*;
pub use gemini::*;
pub use generation::*;
pub use normalize::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use request::*;
pub use sanitize::*;
pub use schema::*;
pub use types::*;

use thiserror::Error;

/// Everything that can go wrong between a typed request and a typed answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("AI model is unavailable: {0}")]
    ModelUnavailable(String),

    #[error("AI model returned error (status {status}): {body}")]
    ModelError { status: u16, body: String },

    #[error("AI response blocked by content safety filter: {0}")]
    ContentBlocked(String),

    #[error("AI model returned no usable output: {0}")]
    EmptyModelOutput(String),
}

impl AiError {
    /// Plain-language message safe to show to a patient.
    ///
    /// Never includes upstream bodies or model text.
    pub fn user_message(&self) -> String {
        match self {
            AiError::Validation(detail) => detail.clone(),
            AiError::ModelUnavailable(_) | AiError::ModelError { .. } => {
                "The AI assistant is temporarily unavailable. Please try again in a few \
                 minutes, or consult a healthcare professional if your concern is urgent."
                    .to_string()
            }
            AiError::ContentBlocked(_) => "This request could not be answered safely. Please \
                 rephrase it, or consult a healthcare professional directly."
                .to_string(),
            AiError::EmptyModelOutput(_) => "The AI assistant could not produce a reliable \
                 answer this time. Please try again, or consult a healthcare professional."
                .to_string(),
        }
    }

    /// Stable machine-readable code, safe for logs and API bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AiError::Validation(_) => "validation_error",
            AiError::ModelUnavailable(_) => "model_unavailable",
            AiError::ModelError { .. } => "model_error",
            AiError::ContentBlocked(_) => "content_blocked",
            AiError::EmptyModelOutput(_) => "empty_model_output",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AiError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_passes_detail_through() {
        let err = AiError::Validation("Please describe your symptoms in more detail.".into());
        assert_eq!(err.user_message(), "Please describe your symptoms in more detail.");
        assert!(err.is_validation());
    }

    #[test]
    fn upstream_failures_hide_details() {
        let err = AiError::ModelError {
            status: 500,
            body: "internal stack trace".into(),
        };
        let msg = err.user_message();
        assert!(!msg.contains("stack trace"));
        assert!(msg.contains("healthcare professional"));
        assert_eq!(err.code(), "model_error");
    }

    #[test]
    fn every_non_validation_message_recommends_professional() {
        let errors = [
            AiError::ModelUnavailable("timeout".into()),
            AiError::ContentBlocked("SAFETY".into()),
            AiError::EmptyModelOutput("no candidates".into()),
        ];
        for err in errors {
            assert!(err.user_message().contains("healthcare professional"));
            assert!(!err.is_validation());
        }
    }
}
