use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::generation::SafetySetting;
use super::types::{GenerateRequest, LlmClient};
use super::AiError;

/// Hosted Generative Language API client (structured JSON output).
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, AiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AiError::ModelUnavailable(format!("HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            client,
            timeout_secs,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: WireGenerationConfig,
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Request body for `generateContent`.
pub fn build_body(request: &GenerateRequest) -> Result<Value, AiError> {
    let mut parts = vec![Part::Text {
        text: &request.prompt,
    }];
    parts.extend(request.images.iter().map(|image| Part::Inline {
        inline_data: InlineData {
            mime_type: &image.mime_type,
            data: &image.base64_data,
        },
    }));

    let body = GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part::Text {
                text: &request.system,
            }],
        },
        contents: vec![Content {
            role: Some("user"),
            parts,
        }],
        generation_config: WireGenerationConfig {
            temperature: request.config.temperature,
            response_mime_type: "application/json",
            response_schema: request.schema.to_json_schema(),
        },
        safety_settings: &request.config.safety_settings,
    };
    serde_json::to_value(body)
        .map_err(|e| AiError::ModelUnavailable(format!("Failed to encode model request: {e}")))
}

/// Pull the first candidate's text out of a `generateContent` response.
pub fn extract_candidate_text(body: &str) -> Result<String, AiError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AiError::EmptyModelOutput(format!("Unreadable model response: {e}")))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AiError::ContentBlocked(reason));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AiError::EmptyModelOutput("No candidates returned".into()))?;

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(AiError::ContentBlocked("SAFETY".into()));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::EmptyModelOutput(format!(
            "Candidate had no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(text)
}

impl LlmClient for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::ModelUnavailable("Model API key is not configured".into()))?;
        let payload = build_body(request)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AiError::ModelUnavailable(format!("Cannot reach {}", self.base_url))
                } else if e.is_timeout() {
                    AiError::ModelUnavailable(format!(
                        "Request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    AiError::ModelUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            tracing::warn!(
                use_case = %request.use_case,
                status = status.as_u16(),
                "Model API returned non-success status"
            );
            return Err(AiError::ModelError {
                status: status.as_u16(),
                body,
            });
        }

        extract_candidate_text(&body)
    }
}

/// Mock LLM client for testing: returns a configured response or failure
/// and records every request it receives.
pub struct MockLlmClient {
    outcome: Result<String, AiError>,
    calls: Mutex<Vec<GenerateRequest>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: AiError) -> Self {
        Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerateRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        self.outcome.clone()
    }
}
