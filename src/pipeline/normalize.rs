//! Normalization of parsed model output into the typed result contracts.
//!
//! Guarantees on every returned value:
//! - medical-content results carry a non-empty disclaimer (the model's own
//!   text is kept unchanged when present, the canonical default otherwise);
//! - every list field is present, malformed list items are skipped;
//! - a chatbot result has exactly one populated variant, compatible with the
//!   conversation route.
//!
//! Missing required scalar fields fail with `AiError::EmptyModelOutput`.

use serde_json::{Map, Value};

use super::chatbot::ChatRoute;
use super::types::{
    ChatbotResult, KeyParameter, LabAnalysisResult, MedicineInsight, ParameterStatus,
    PossibleCondition, PrescriptionInsight, RemedyResult, SymptomAnalysisResult,
};
use super::AiError;

pub const SYMPTOM_DISCLAIMER: &str = "This is not a medical diagnosis. The information above \
    is for general guidance only. Please consult a qualified healthcare professional for \
    diagnosis and treatment.";

pub const REMEDY_DISCLAIMER: &str = "Home remedies are not a substitute for professional \
    medical advice. Stop using the remedy if symptoms worsen, and consult a healthcare \
    professional if they persist.";

pub const LAB_DISCLAIMER: &str = "This explanation is not a diagnosis. Lab values must be \
    interpreted by your doctor together with your medical history. Please review this report \
    with a healthcare professional.";

pub const PRESCRIPTION_DISCLAIMER: &str = "Handwritten prescriptions can be misread. Always \
    confirm medicine names and dosages with your pharmacist or doctor before taking anything.";

pub const REPORT_INSIGHT_DISCLAIMER_SUFFIX: &str = "Disclaimer: this is general information \
    about your report, not a diagnosis. Please discuss the results with a healthcare \
    professional.";

pub const DEFAULT_CLARIFICATION: &str =
    "Could you tell me a little more so I can help? For example, how long you have had \
     the symptoms and how severe they are.";

pub const DEFAULT_CHAT_ERROR: &str = "I'm sorry, I can't help with that request. Please \
    consult a healthcare professional.";

/// Keep a non-blank disclaimer as written, otherwise use the default.
pub fn ensure_disclaimer(disclaimer: Option<String>, default: &str) -> String {
    match disclaimer {
        Some(text) if !text.trim().is_empty() => text,
        _ => default.to_string(),
    }
}

/// Make the message end with a disclaimer.
///
/// The suffix is skipped only when the message already closes with it, or
/// when its last paragraph is itself a disclaimer.
pub fn ensure_report_disclaimer(message: &str) -> String {
    let body = message.trim_end();
    if body.ends_with(REPORT_INSIGHT_DISCLAIMER_SUFFIX) {
        return body.to_string();
    }

    let closes_with_disclaimer = body
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .last()
        .is_some_and(|p| p.to_lowercase().starts_with("disclaimer"));
    if closes_with_disclaimer {
        return body.to_string();
    }

    format!("{body}\n\n{REPORT_INSIGHT_DISCLAIMER_SUFFIX}")
}

// ──────────────────────────────────────────────
// Lenient field access
// ──────────────────────────────────────────────

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, AiError> {
    value
        .as_object()
        .ok_or_else(|| AiError::EmptyModelOutput(format!("{what} is not a JSON object")))
}

/// Non-blank string; numbers and booleans are rendered as text.
fn text_field(obj: &Map<String, Value>, name: &str) -> Option<String> {
    match obj.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Disclaimer text kept byte-for-byte (no trimming).
fn raw_text_field(obj: &Map<String, Value>, name: &str) -> Option<String> {
    obj.get(name).and_then(Value::as_str).map(str::to_string)
}

fn required_text(obj: &Map<String, Value>, name: &str, what: &str) -> Result<String, AiError> {
    text_field(obj, name)
        .ok_or_else(|| AiError::EmptyModelOutput(format!("{what} is missing '{name}'")))
}

/// Absent → empty; a lone string becomes a single item; blank items dropped.
fn string_list(obj: &Map<String, Value>, name: &str) -> Vec<String> {
    match obj.get(name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => vec![],
    }
}

/// Parse an array leniently: skip items that fail to convert.
fn object_list<T>(
    obj: &Map<String, Value>,
    name: &str,
    item: fn(&Map<String, Value>) -> Option<T>,
) -> Vec<T> {
    match obj.get(name) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(item)
            .collect(),
        _ => vec![],
    }
}

// ──────────────────────────────────────────────
// Per use case
// ──────────────────────────────────────────────

fn condition_item(obj: &Map<String, Value>) -> Option<PossibleCondition> {
    Some(PossibleCondition {
        name: text_field(obj, "name")?,
        description: text_field(obj, "description").unwrap_or_default(),
    })
}

pub fn normalize_symptom_analysis(value: &Value) -> Result<SymptomAnalysisResult, AiError> {
    let obj = as_object(value, "SymptomAnalysis")?;
    Ok(SymptomAnalysisResult {
        possible_conditions: object_list(obj, "possibleConditions", condition_item),
        suggested_next_steps: string_list(obj, "suggestedNextSteps"),
        wellness_tip: text_field(obj, "wellnessTip"),
        disclaimer: ensure_disclaimer(raw_text_field(obj, "disclaimer"), SYMPTOM_DISCLAIMER),
    })
}

pub fn normalize_remedy(value: &Value) -> Result<RemedyResult, AiError> {
    let obj = as_object(value, "RemedyResult")?;
    Ok(RemedyResult {
        name: required_text(obj, "name", "RemedyResult")?,
        category: required_text(obj, "category", "RemedyResult")?,
        description: required_text(obj, "description", "RemedyResult")?,
        ingredients: string_list(obj, "ingredients"),
        preparation: text_field(obj, "preparation"),
        usage: text_field(obj, "usage"),
        notes: text_field(obj, "notes"),
        disclaimer: ensure_disclaimer(raw_text_field(obj, "disclaimer"), REMEDY_DISCLAIMER),
    })
}

fn key_parameter_item(obj: &Map<String, Value>) -> Option<KeyParameter> {
    Some(KeyParameter {
        name: text_field(obj, "name")?,
        value: text_field(obj, "value")?,
        unit: text_field(obj, "unit"),
        reference_range: text_field(obj, "referenceRange"),
        status: text_field(obj, "status").map(|s| ParameterStatus::from_label(&s)),
        interpretation: text_field(obj, "interpretation"),
    })
}

pub fn normalize_lab_analysis(value: &Value) -> Result<LabAnalysisResult, AiError> {
    let obj = as_object(value, "LabAnalysisResult")?;
    Ok(LabAnalysisResult {
        summary: required_text(obj, "summary", "LabAnalysisResult")?,
        key_parameters: object_list(obj, "keyParameters", key_parameter_item),
        suggestions: string_list(obj, "suggestions"),
        warnings_or_watchouts: string_list(obj, "warningsOrWatchouts"),
        next_step: required_text(obj, "nextStep", "LabAnalysisResult")?,
        follow_up_questions: string_list(obj, "followUpQuestions"),
        disclaimer: ensure_disclaimer(raw_text_field(obj, "disclaimer"), LAB_DISCLAIMER),
    })
}

fn medicine_item(obj: &Map<String, Value>) -> Option<MedicineInsight> {
    Some(MedicineInsight {
        name: text_field(obj, "name")?,
        purpose: text_field(obj, "purpose")?,
        benefit: text_field(obj, "benefit"),
        usage: text_field(obj, "usage"),
    })
}

pub fn normalize_prescription(value: &Value) -> Result<PrescriptionInsight, AiError> {
    let obj = as_object(value, "PrescriptionInsight")?;
    Ok(PrescriptionInsight {
        medicines: object_list(obj, "medicines", medicine_item),
        summary: text_field(obj, "summary"),
        disclaimer: ensure_disclaimer(raw_text_field(obj, "disclaimer"), PRESCRIPTION_DISCLAIMER),
    })
}

fn payload<'a>(obj: &'a Map<String, Value>, field: &str, kind: &str) -> Result<&'a Value, AiError> {
    match obj.get(field) {
        Some(v @ Value::Object(_)) => Ok(v),
        _ => Err(AiError::EmptyModelOutput(format!(
            "Chatbot answer of type '{kind}' is missing '{field}'"
        ))),
    }
}

/// Build the single chatbot variant named by `type`. Payload fields that
/// belong to other variants are ignored.
pub fn normalize_chatbot(value: &Value, route: ChatRoute) -> Result<ChatbotResult, AiError> {
    let obj = as_object(value, "ChatbotResult")?;
    let kind = text_field(obj, "type")
        .map(|t| t.to_lowercase())
        .ok_or_else(|| AiError::EmptyModelOutput("Chatbot answer has no 'type'".into()))?;

    if !route.allows(&kind) {
        return Err(AiError::EmptyModelOutput(format!(
            "Chatbot answer type '{kind}' is not valid for the {} route",
            route.as_str()
        )));
    }

    let result = match kind.as_str() {
        "analysis" => ChatbotResult::Analysis {
            analysis: normalize_symptom_analysis(payload(obj, "analysis", &kind)?)?,
        },
        "remedy" => ChatbotResult::Remedy {
            remedy: normalize_remedy(payload(obj, "remedy", &kind)?)?,
        },
        "prescription_insight" => ChatbotResult::PrescriptionInsight {
            prescription_insight: normalize_prescription(payload(
                obj,
                "prescriptionInsight",
                &kind,
            )?)?,
        },
        "report_insight" => {
            let message = text_field(obj, "reportInsightMessage").ok_or_else(|| {
                AiError::EmptyModelOutput("Report insight has no message".into())
            })?;
            ChatbotResult::ReportInsight {
                report_insight_message: ensure_report_disclaimer(&message),
            }
        }
        "clarification" => ChatbotResult::Clarification {
            message: text_field(obj, "message").unwrap_or_else(|| DEFAULT_CLARIFICATION.into()),
        },
        "error" => ChatbotResult::Error {
            error_message: text_field(obj, "errorMessage")
                .unwrap_or_else(|| DEFAULT_CHAT_ERROR.into()),
        },
        other => {
            return Err(AiError::EmptyModelOutput(format!(
                "Unknown chatbot answer type '{other}'"
            )))
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn injects_default_disclaimer_when_missing_or_blank() {
        let missing = normalize_symptom_analysis(&json!({
            "possibleConditions": [{"name": "Common cold", "description": "Viral infection."}]
        }))
        .unwrap();
        assert_eq!(missing.disclaimer, SYMPTOM_DISCLAIMER);

        let blank = normalize_remedy(&json!({
            "name": "Honey lemon", "category": "dietary",
            "description": "Soothes the throat.", "disclaimer": "   "
        }))
        .unwrap();
        assert_eq!(blank.disclaimer, REMEDY_DISCLAIMER);
    }

    #[test]
    fn preserves_model_disclaimer_unchanged() {
        let result = normalize_prescription(&json!({
            "medicines": [],
            "disclaimer": "  Check with your pharmacist.  "
        }))
        .unwrap();
        assert_eq!(result.disclaimer, "  Check with your pharmacist.  ");
    }

    #[test]
    fn disclaimer_injection_is_idempotent() {
        let first = normalize_lab_analysis(&json!({
            "summary": "Mostly normal.", "nextStep": "See your GP."
        }))
        .unwrap();
        let again = normalize_lab_analysis(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, again);
        assert_eq!(again.disclaimer, LAB_DISCLAIMER);
    }

    #[test]
    fn absent_lists_become_empty() {
        let result = normalize_lab_analysis(&json!({
            "summary": "Hemoglobin slightly low.",
            "nextStep": "Discuss iron levels with your doctor."
        }))
        .unwrap();
        assert!(result.warnings_or_watchouts.is_empty());
        assert!(result.key_parameters.is_empty());
        assert!(result.follow_up_questions.is_empty());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["warningsOrWatchouts"], json!([]));
    }

    #[test]
    fn malformed_list_items_are_skipped() {
        let result = normalize_lab_analysis(&json!({
            "summary": "s", "nextStep": "n",
            "keyParameters": [
                {"name": "Hemoglobin", "value": 10.2, "unit": "g/dL", "status": "Low"},
                {"name": "missing value"},
                "not an object",
                {"name": "WBC", "value": "7.1", "status": "weird"}
            ],
            "suggestions": ["Eat iron-rich foods", 42, null, ""]
        }))
        .unwrap();
        assert_eq!(result.key_parameters.len(), 2);
        assert_eq!(result.key_parameters[0].value, "10.2");
        assert_eq!(result.key_parameters[0].status, Some(ParameterStatus::Low));
        assert_eq!(result.key_parameters[1].status, Some(ParameterStatus::Unknown));
        assert_eq!(result.suggestions, vec!["Eat iron-rich foods", "42"]);
    }

    #[test]
    fn single_string_becomes_one_item_list() {
        let result = normalize_remedy(&json!({
            "name": "Ginger tea", "category": "herbal", "description": "For nausea.",
            "ingredients": "1 inch fresh ginger"
        }))
        .unwrap();
        assert_eq!(result.ingredients, vec!["1 inch fresh ginger"]);
    }

    #[test]
    fn missing_required_scalar_is_empty_output() {
        let err = normalize_remedy(&json!({"name": "Ginger tea", "category": "herbal"}))
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyModelOutput(msg) if msg.contains("description")));
    }

    #[test]
    fn chatbot_keeps_only_the_tagged_variant() {
        let value = json!({
            "type": "analysis",
            "analysis": {"suggestedNextSteps": ["Rest"], "disclaimer": "Not a diagnosis."},
            "remedy": {"name": "Tea", "category": "herbal", "description": "x"},
            "errorMessage": "should be dropped"
        });
        let result = normalize_chatbot(&value, ChatRoute::FreeText).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(json["type"], "analysis");
        assert!(json.get("remedy").is_none());
        assert!(json.get("errorMessage").is_none());
    }

    #[test]
    fn chatbot_type_outside_route_is_rejected() {
        let value = json!({"type": "remedy", "remedy": {"name": "a", "category": "b", "description": "c"}});
        assert!(normalize_chatbot(&value, ChatRoute::ReportInsight).is_err());
        assert!(normalize_chatbot(&value, ChatRoute::FreeText).is_ok());
    }

    #[test]
    fn chatbot_missing_payload_is_empty_output() {
        let value = json!({"type": "prescription_insight"});
        assert!(matches!(
            normalize_chatbot(&value, ChatRoute::PrescriptionInsight),
            Err(AiError::EmptyModelOutput(_))
        ));
    }

    #[test]
    fn report_insight_always_ends_with_disclaimer() {
        let value = json!({"type": "report_insight", "reportInsightMessage": "Your TSH is normal."});
        match normalize_chatbot(&value, ChatRoute::ReportInsight).unwrap() {
            ChatbotResult::ReportInsight { report_insight_message } => {
                assert!(report_insight_message.starts_with("Your TSH is normal."));
                assert!(report_insight_message.ends_with(REPORT_INSIGHT_DISCLAIMER_SUFFIX));
            }
            other => panic!("unexpected {other:?}"),
        }

        let already = format!("TSH normal.\n\n{REPORT_INSIGHT_DISCLAIMER_SUFFIX}");
        assert_eq!(ensure_report_disclaimer(&already), already);
        assert_eq!(ensure_report_disclaimer(&format!("{already}\n")), already);

        let own = "TSH normal.\n\nDisclaimer: not a diagnosis, ask your doctor.";
        assert_eq!(ensure_report_disclaimer(own), own);
    }

    #[test]
    fn early_professional_mention_still_gets_closing_disclaimer() {
        let message = "Please see a healthcare professional. Your TSH of 6.2 mIU/L is above \
                       the reference range.";
        let value = json!({"type": "report_insight", "reportInsightMessage": message});
        match normalize_chatbot(&value, ChatRoute::ReportInsight).unwrap() {
            ChatbotResult::ReportInsight { report_insight_message } => {
                assert!(report_insight_message.starts_with("Please see a healthcare professional."));
                assert!(report_insight_message.ends_with(REPORT_INSIGHT_DISCLAIMER_SUFFIX));
            }
            other => panic!("unexpected {other:?}"),
        }

        let mid = "Disclaimer: general info only.\n\nYour ferritin is low.";
        assert!(ensure_report_disclaimer(mid).ends_with(REPORT_INSIGHT_DISCLAIMER_SUFFIX));
    }

    #[test]
    fn clarification_and_error_get_default_text() {
        let clarification =
            normalize_chatbot(&json!({"type": "Clarification"}), ChatRoute::FreeText).unwrap();
        assert_eq!(
            clarification,
            ChatbotResult::Clarification {
                message: DEFAULT_CLARIFICATION.into()
            }
        );
        let error = normalize_chatbot(&json!({"type": "error"}), ChatRoute::ReportInsight).unwrap();
        assert_eq!(
            error,
            ChatbotResult::Error {
                error_message: DEFAULT_CHAT_ERROR.into()
            }
        );
    }

    #[test]
    fn non_object_output_is_rejected() {
        assert!(normalize_symptom_analysis(&json!(["a"])).is_err());
        assert!(normalize_chatbot(&json!({"message": "hi"}), ChatRoute::FreeText).is_err());
    }
}
