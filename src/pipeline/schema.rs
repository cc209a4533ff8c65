//! Declared output schemas.
//!
//! One declaration feeds two consumers: the model's `responseSchema`
//! (generation constraint) and the field listing embedded in each prompt.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Enum(&'static [&'static str]),
    StringList,
    Object(&'static [SchemaField]),
    ObjectList(&'static [SchemaField]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Natural-language generation hint.
    pub description: &'static str,
}

impl SchemaField {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub fields: &'static [SchemaField],
}

impl OutputSchema {
    /// OpenAPI-subset schema accepted by `generationConfig.responseSchema`.
    pub fn to_json_schema(&self) -> Value {
        object_schema(self.fields)
    }

    /// Field listing for the prompt, one line per field, nested fields indented.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        describe_fields(self.fields, 0, &mut out);
        out
    }
}

fn object_schema(fields: &[SchemaField]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut prop = kind_schema(&field.kind);
        if let Value::Object(map) = &mut prop {
            map.insert("description".into(), Value::String(field.description.into()));
        }
        properties.insert(field.name.to_string(), prop);
    }
    let required: Vec<&str> = fields.iter().filter(|f| f.required).map(|f| f.name).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String => json!({ "type": "STRING" }),
        FieldKind::Enum(values) => json!({ "type": "STRING", "enum": values }),
        FieldKind::StringList => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        FieldKind::Object(fields) => object_schema(fields),
        FieldKind::ObjectList(fields) => json!({ "type": "ARRAY", "items": object_schema(fields) }),
    }
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::String => "string".into(),
        FieldKind::Enum(values) => format!("one of: {}", values.join(" | ")),
        FieldKind::StringList => "list of strings".into(),
        FieldKind::Object(_) => "object".into(),
        FieldKind::ObjectList(_) => "list of objects".into(),
    }
}

fn describe_fields(fields: &[SchemaField], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let presence = if field.required { "required" } else { "optional" };
        out.push_str(&format!(
            "{indent}- {} ({}, {presence}): {}\n",
            field.name,
            kind_label(&field.kind),
            field.description
        ));
        if let FieldKind::Object(nested) | FieldKind::ObjectList(nested) = field.kind {
            describe_fields(nested, depth + 1, out);
        }
    }
}

// ──────────────────────────────────────────────
// Per use case declarations
// ──────────────────────────────────────────────

const CONDITION_FIELDS: &[SchemaField] = &[
    SchemaField::required("name", FieldKind::String, "Name of the possible condition."),
    SchemaField::required(
        "description",
        FieldKind::String,
        "One or two plain-language sentences on why it may match the symptoms.",
    ),
];

pub const SYMPTOM_ANALYSIS_FIELDS: &[SchemaField] = &[
    SchemaField::optional(
        "possibleConditions",
        FieldKind::ObjectList(CONDITION_FIELDS),
        "Up to five conditions that could explain the symptoms, most likely first.",
    ),
    SchemaField::optional(
        "suggestedNextSteps",
        FieldKind::StringList,
        "Simple self-care or follow-up steps. Never prescription medicines.",
    ),
    SchemaField::optional(
        "wellnessTip",
        FieldKind::String,
        "A short stress or wellness suggestion when the person mentions stress or anxiety.",
    ),
    SchemaField::required(
        "disclaimer",
        FieldKind::String,
        "States this is not a diagnosis and recommends consulting a healthcare professional.",
    ),
];

pub const REMEDY_FIELDS: &[SchemaField] = &[
    SchemaField::required("name", FieldKind::String, "Name of the home remedy."),
    SchemaField::required(
        "category",
        FieldKind::String,
        "Category such as herbal, dietary, lifestyle, or topical.",
    ),
    SchemaField::required(
        "description",
        FieldKind::String,
        "What the remedy is and what it may help with.",
    ),
    SchemaField::optional(
        "ingredients",
        FieldKind::StringList,
        "Ingredients with quantities, if any.",
    ),
    SchemaField::optional("preparation", FieldKind::String, "How to prepare the remedy."),
    SchemaField::optional("usage", FieldKind::String, "How and how often to use it."),
    SchemaField::optional(
        "notes",
        FieldKind::String,
        "Precautions, contraindications, or when to stop.",
    ),
    SchemaField::required(
        "disclaimer",
        FieldKind::String,
        "States the remedy does not replace professional medical advice.",
    ),
];

const KEY_PARAMETER_FIELDS: &[SchemaField] = &[
    SchemaField::required("name", FieldKind::String, "Test or parameter name as printed."),
    SchemaField::required("value", FieldKind::String, "Measured value exactly as printed."),
    SchemaField::optional("unit", FieldKind::String, "Unit of measure."),
    SchemaField::optional("referenceRange", FieldKind::String, "Reference range as printed."),
    SchemaField::optional(
        "status",
        FieldKind::Enum(&["normal", "low", "high", "critical", "unknown"]),
        "Position of the value relative to the reference range.",
    ),
    SchemaField::optional(
        "interpretation",
        FieldKind::String,
        "One plain-language sentence on what this parameter measures.",
    ),
];

pub const LAB_ANALYSIS_FIELDS: &[SchemaField] = &[
    SchemaField::required(
        "summary",
        FieldKind::String,
        "Plain-language overview of the report in two to four sentences.",
    ),
    SchemaField::optional(
        "keyParameters",
        FieldKind::ObjectList(KEY_PARAMETER_FIELDS),
        "The most relevant values found in the report.",
    ),
    SchemaField::optional(
        "suggestions",
        FieldKind::StringList,
        "General lifestyle suggestions related to the findings.",
    ),
    SchemaField::optional(
        "warningsOrWatchouts",
        FieldKind::StringList,
        "Values or patterns worth raising with a doctor.",
    ),
    SchemaField::required(
        "nextStep",
        FieldKind::String,
        "The single most useful next step, usually a doctor visit.",
    ),
    SchemaField::optional(
        "followUpQuestions",
        FieldKind::StringList,
        "Questions the patient could ask their doctor about this report.",
    ),
    SchemaField::required(
        "disclaimer",
        FieldKind::String,
        "States this explanation is not a diagnosis and a doctor must review the report.",
    ),
];

const MEDICINE_FIELDS: &[SchemaField] = &[
    SchemaField::required("name", FieldKind::String, "Medicine name as written."),
    SchemaField::required("purpose", FieldKind::String, "What the medicine is commonly used for."),
    SchemaField::optional("benefit", FieldKind::String, "How it commonly helps."),
    SchemaField::optional(
        "usage",
        FieldKind::String,
        "Dosage or timing exactly as written on the prescription.",
    ),
];

pub const PRESCRIPTION_FIELDS: &[SchemaField] = &[
    SchemaField::optional(
        "medicines",
        FieldKind::ObjectList(MEDICINE_FIELDS),
        "Every medicine identified on the prescription.",
    ),
    SchemaField::optional(
        "summary",
        FieldKind::String,
        "One or two sentences describing the prescription as a whole.",
    ),
    SchemaField::required(
        "disclaimer",
        FieldKind::String,
        "States the reading may be inaccurate and the pharmacist or doctor must confirm it.",
    ),
];

pub const CHATBOT_TYPES: &[&str] = &[
    "analysis",
    "remedy",
    "prescription_insight",
    "report_insight",
    "clarification",
    "error",
];

pub const CHATBOT_FIELDS: &[SchemaField] = &[
    SchemaField::required(
        "type",
        FieldKind::Enum(CHATBOT_TYPES),
        "Which kind of answer this is. Populate only the field that belongs to this type.",
    ),
    SchemaField::optional(
        "analysis",
        FieldKind::Object(SYMPTOM_ANALYSIS_FIELDS),
        "Only for type analysis.",
    ),
    SchemaField::optional("remedy", FieldKind::Object(REMEDY_FIELDS), "Only for type remedy."),
    SchemaField::optional(
        "prescriptionInsight",
        FieldKind::Object(PRESCRIPTION_FIELDS),
        "Only for type prescription_insight.",
    ),
    SchemaField::optional(
        "reportInsightMessage",
        FieldKind::String,
        "Only for type report_insight: the answer, ending with a disclaimer.",
    ),
    SchemaField::optional(
        "message",
        FieldKind::String,
        "Only for type clarification: one follow-up question.",
    ),
    SchemaField::optional(
        "errorMessage",
        FieldKind::String,
        "Only for type error: polite refusal recommending a professional.",
    ),
];

pub static SYMPTOM_ANALYSIS_SCHEMA: OutputSchema = OutputSchema {
    name: "SymptomAnalysis",
    fields: SYMPTOM_ANALYSIS_FIELDS,
};

pub static REMEDY_SCHEMA: OutputSchema = OutputSchema {
    name: "RemedyResult",
    fields: REMEDY_FIELDS,
};

pub static LAB_ANALYSIS_SCHEMA: OutputSchema = OutputSchema {
    name: "LabAnalysisResult",
    fields: LAB_ANALYSIS_FIELDS,
};

pub static PRESCRIPTION_SCHEMA: OutputSchema = OutputSchema {
    name: "PrescriptionInsight",
    fields: PRESCRIPTION_FIELDS,
};

pub static CHATBOT_SCHEMA: OutputSchema = OutputSchema {
    name: "ChatbotResult",
    fields: CHATBOT_FIELDS,
};
