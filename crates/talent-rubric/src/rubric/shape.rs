use serde_json::{Map, Value};
use std::fmt;

use super::adapters::{BasicPayload, LegacyPayload, StructuredPayload};
use super::domain::RubricDocument;
use super::RubricError;

/// Discriminant of the payload shapes the backend has produced over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    StructuredExtraction,
    BasicAnalysis,
    Canonical,
    Legacy,
}

impl PayloadKind {
    pub fn label(&self) -> &'static str {
        match self {
            PayloadKind::StructuredExtraction => "structured extraction",
            PayloadKind::BasicAnalysis => "basic analysis",
            PayloadKind::Canonical => "canonical",
            PayloadKind::Legacy => "legacy",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type ShapePredicate = fn(&Map<String, Value>) -> bool;

/// Checked in order; the first match wins.
const SHAPE_PRECEDENCE: [(PayloadKind, ShapePredicate); 4] = [
    (PayloadKind::StructuredExtraction, is_structured_extraction),
    (PayloadKind::BasicAnalysis, is_basic_analysis),
    (PayloadKind::Canonical, is_canonical),
    (PayloadKind::Legacy, is_legacy),
];

fn is_object(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(Value::is_object)
}

fn is_structured_extraction(fields: &Map<String, Value>) -> bool {
    is_object(fields, "metadata")
        && is_object(fields, "context")
        && fields
            .get("requirements")
            .and_then(Value::as_object)
            .and_then(|requirements| requirements.get("must_have"))
            .is_some_and(Value::is_array)
}

fn is_basic_analysis(fields: &Map<String, Value>) -> bool {
    is_object(fields, "job_data")
        && fields.get("domain").is_some_and(Value::is_string)
        && fields.get("domain_confidence").is_some_and(Value::is_number)
        && fields.get("raw_jd_text").is_some_and(Value::is_string)
        && !fields.get("sections").is_some_and(Value::is_array)
}

fn is_canonical(fields: &Map<String, Value>) -> bool {
    fields.get("sections").is_some_and(Value::is_array)
}

const LEGACY_DICTIONARIES: [&str; 2] = [super::MANDATORY_SECTION_KEY, super::SCREENING_SECTION_KEY];

/// A `criteria` object that names at least one of the legacy dictionaries.
fn is_legacy(fields: &Map<String, Value>) -> bool {
    fields
        .get("criteria")
        .and_then(Value::as_object)
        .is_some_and(|criteria| {
            LEGACY_DICTIONARIES
                .iter()
                .any(|key| criteria.contains_key(*key))
        })
}

/// Classifies a payload without decoding it.
pub fn detect_shape(payload: &Value) -> Result<PayloadKind, RubricError> {
    let Some(fields) = payload.as_object() else {
        return Err(RubricError::ShapeDetection {
            fields: format!("<{}>", json_type(payload)),
        });
    };

    SHAPE_PRECEDENCE
        .iter()
        .find(|(_, matches)| matches(fields))
        .map(|(kind, _)| *kind)
        .ok_or_else(|| RubricError::ShapeDetection {
            fields: describe_fields(fields),
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe_fields(fields: &Map<String, Value>) -> String {
    if fields.is_empty() {
        return "<none>".to_string();
    }
    fields.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// A payload decoded into the typed form of its detected shape.
#[derive(Debug, Clone)]
pub enum PayloadShape {
    Structured(StructuredPayload),
    Basic(BasicPayload),
    Canonical(RubricDocument),
    Legacy(LegacyPayload),
}

impl PayloadShape {
    pub fn parse(payload: Value) -> Result<Self, RubricError> {
        let kind = detect_shape(&payload)?;
        let decode_error = |source| RubricError::MalformedPayload { kind, source };

        let shape = match kind {
            PayloadKind::StructuredExtraction => {
                PayloadShape::Structured(serde_json::from_value(payload).map_err(decode_error)?)
            }
            PayloadKind::BasicAnalysis => {
                PayloadShape::Basic(serde_json::from_value(payload).map_err(decode_error)?)
            }
            PayloadKind::Canonical => {
                PayloadShape::Canonical(serde_json::from_value(payload).map_err(decode_error)?)
            }
            PayloadKind::Legacy => {
                PayloadShape::Legacy(serde_json::from_value(payload).map_err(decode_error)?)
            }
        };
        Ok(shape)
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            PayloadShape::Structured(_) => PayloadKind::StructuredExtraction,
            PayloadShape::Basic(_) => PayloadKind::BasicAnalysis,
            PayloadShape::Canonical(_) => PayloadKind::Canonical,
            PayloadShape::Legacy(_) => PayloadKind::Legacy,
        }
    }
}
