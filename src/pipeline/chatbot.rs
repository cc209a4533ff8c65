//! Conversational flow. One answer per message, never an `Err` except for
//! input validation: every other failure becomes `ChatbotResult::Error`.

use super::normalize::normalize_chatbot;
use super::orchestrator::HealthAssistant;
use super::request::{AiRequest, ChatbotQuery, ImageData, ValidRequest};
use super::types::ChatbotResult;
use super::AiError;

/// Which kind of conversation the message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRoute {
    ReportInsight,
    PrescriptionInsight,
    FreeText,
}

impl ChatRoute {
    /// Priority order: report context, then prescription image, then free text.
    pub fn select(report_context: Option<&str>, image: Option<&ImageData>) -> Self {
        match (report_context, image) {
            (Some(ctx), _) if !ctx.trim().is_empty() => ChatRoute::ReportInsight,
            (_, Some(_)) => ChatRoute::PrescriptionInsight,
            _ => ChatRoute::FreeText,
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            ChatRoute::ReportInsight => &["report_insight", "clarification", "error"],
            ChatRoute::PrescriptionInsight => &["prescription_insight", "clarification", "error"],
            ChatRoute::FreeText => &["analysis", "remedy", "clarification", "error"],
        }
    }

    pub fn allows(&self, kind: &str) -> bool {
        self.allowed_types().iter().any(|t| *t == kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRoute::ReportInsight => "report_insight",
            ChatRoute::PrescriptionInsight => "prescription_insight",
            ChatRoute::FreeText => "free_text",
        }
    }
}

impl HealthAssistant {
    pub fn chat(&self, query: ChatbotQuery) -> Result<ChatbotResult, AiError> {
        let request = AiRequest::Chatbot(query).validate()?;
        let route = match &request {
            ValidRequest::Chatbot {
                image,
                report_context,
                ..
            } => ChatRoute::select(report_context.as_deref(), image.as_ref()),
            _ => ChatRoute::FreeText,
        };
        let _span = tracing::info_span!("chat", route = route.as_str()).entered();

        let outcome = self
            .generate_json(&request)
            .and_then(|value| normalize_chatbot(&value, route));

        match outcome {
            Ok(result) => {
                tracing::info!(answer_type = result.type_name(), "Chat answer ready");
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = e.code(), "Chat flow failed, returning error answer");
                Ok(ChatbotResult::Error {
                    error_message: e.user_message(),
                })
            }
        }
    }
}
