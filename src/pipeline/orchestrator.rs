use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use super::normalize::{
    normalize_lab_analysis, normalize_prescription, normalize_remedy, normalize_symptom_analysis,
};
use super::parser::extract_json_object;
use super::prompt::build_prompt;
use super::request::{
    AiRequest, LabReportQuery, PrescriptionQuery, RemedyQuery, SymptomQuery, ValidRequest,
};
use super::types::{
    ChatbotResult, GenerateRequest, LabAnalysisResult, LlmClient, PrescriptionInsight,
    RemedyResult, SymptomAnalysisResult,
};
use super::AiError;

/// Typed answer for any use case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AiResponse {
    Symptom(SymptomAnalysisResult),
    Remedy(RemedyResult),
    LabReport(LabAnalysisResult),
    Prescription(PrescriptionInsight),
    Chatbot(ChatbotResult),
}

/// Runs the structured-output flows:
/// validate → sanitize → prompt → model → parse → normalize
#[derive(Clone)]
pub struct HealthAssistant {
    llm: Arc<dyn LlmClient + Send + Sync>,
}

impl HealthAssistant {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>) -> Self {
        Self { llm }
    }

    pub fn analyze_symptoms(&self, query: SymptomQuery) -> Result<SymptomAnalysisResult, AiError> {
        let request = AiRequest::Symptom(query).validate()?;
        let value = self.generate_json(&request)?;
        normalize_symptom_analysis(&value)
    }

    pub fn suggest_remedy(&self, query: RemedyQuery) -> Result<RemedyResult, AiError> {
        let request = AiRequest::Remedy(query).validate()?;
        let value = self.generate_json(&request)?;
        normalize_remedy(&value)
    }

    pub fn analyze_lab_report(&self, query: LabReportQuery) -> Result<LabAnalysisResult, AiError> {
        let request = AiRequest::LabReport(query).validate()?;
        let value = self.generate_json(&request)?;
        normalize_lab_analysis(&value)
    }

    pub fn analyze_prescription(
        &self,
        query: PrescriptionQuery,
    ) -> Result<PrescriptionInsight, AiError> {
        let request = AiRequest::Prescription(query).validate()?;
        let value = self.generate_json(&request)?;
        normalize_prescription(&value)
    }

    /// Dispatch any request to its flow.
    pub fn run(&self, request: AiRequest) -> Result<AiResponse, AiError> {
        match request {
            AiRequest::Symptom(q) => self.analyze_symptoms(q).map(AiResponse::Symptom),
            AiRequest::Remedy(q) => self.suggest_remedy(q).map(AiResponse::Remedy),
            AiRequest::LabReport(q) => self.analyze_lab_report(q).map(AiResponse::LabReport),
            AiRequest::Prescription(q) => {
                self.analyze_prescription(q).map(AiResponse::Prescription)
            }
            AiRequest::Chatbot(q) => self.chat(q).map(AiResponse::Chatbot),
        }
    }

    /// Build the prompt, call the model once, and locate the JSON object.
    pub(crate) fn generate_json(&self, request: &ValidRequest) -> Result<Value, AiError> {
        let use_case = request.use_case();
        let _span = tracing::info_span!("ai_generate", use_case = %use_case).entered();

        let prompt = build_prompt(request);
        let generate = GenerateRequest {
            use_case,
            system: prompt.system,
            prompt: prompt.text,
            images: prompt.images,
            schema: use_case.schema(),
            config: use_case.generation_config(),
        };

        let start = Instant::now();
        let text = self.llm.generate(&generate).map_err(|e| {
            tracing::warn!(
                error = e.code(),
                latency_ms = start.elapsed().as_millis() as u64,
                "Model call failed"
            );
            e
        })?;

        tracing::info!(
            images = generate.images.len(),
            response_chars = text.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Model call complete"
        );

        extract_json_object(&text).map_err(|e| {
            tracing::warn!(error = e.code(), "Model output did not contain a JSON object");
            e
        })
    }
}
