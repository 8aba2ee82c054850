//! Adapter for the structured "requirements / roles / gates" extraction.

use serde::Deserialize;
use tracing::debug;

use crate::config::RubricConfig;
use crate::rubric::domain::{
    Criterion, ExtractionInsights, GateSummary, JobData, RubricDocument, RubricSection,
};
use crate::rubric::naming::{to_snake_case, to_title_case};
use crate::rubric::weights::apply_rescaled_weights;
use crate::rubric::{
    lenient, DEFAULT_DOMAIN_CONFIDENCE, MANDATORY_SECTION_KEY, SCREENING_SECTION_KEY,
};

const MANDATORY_LABEL: &str = "Must-Have Requirements";
const SCREENING_LABEL: &str = "Preferred Qualifications";
const FALLBACK_TITLE: &str = "Extracted Role";
const FALLBACK_DESCRIPTION: &str = "No responsibilities were extracted from the job description.";
const DESCRIPTION_RESPONSIBILITIES: usize = 5;

const GATE_IMPORTANCE: u8 = 7;
const MUST_HAVE_IMPORTANCE: u8 = 5;
const NICE_TO_HAVE_IMPORTANCE: u8 = 3;
const FALLBACK_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredPayload {
    pub metadata: ExtractionMetadata,
    pub requirements: ExtractedRequirements,
    pub context: ExtractedContext,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub raw_jd_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionMetadata {
    #[serde(default)]
    pub role_family: Option<ScoredValue>,
    #[serde(default)]
    pub seniority: Option<ScoredValue>,
    #[serde(default)]
    pub needs_clarification: Option<ClarificationFlag>,
}

/// An extracted value, with or without a confidence score attached.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoredValue {
    Plain(String),
    Scored {
        value: String,
        #[serde(default, deserialize_with = "lenient::optional_number")]
        confidence: Option<f64>,
    },
}

impl ScoredValue {
    pub fn value(&self) -> &str {
        match self {
            ScoredValue::Plain(value) | ScoredValue::Scored { value, .. } => value.trim(),
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            ScoredValue::Plain(_) => None,
            ScoredValue::Scored { confidence, .. } => *confidence,
        }
    }
}

/// Either a bare flag or the list of open questions that raised it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClarificationFlag {
    Flag(bool),
    Items(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedRequirements {
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub must_have: Vec<ExtractedRequirement>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub nice_to_have: Vec<ExtractedRequirement>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub gates_final: Vec<ExtractedGate>,
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub needs_review_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedRequirement {
    #[serde(alias = "requirement", alias = "text", alias = "name")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub extraction_confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedGate {
    #[serde(alias = "gate", alias = "text", alias = "name")]
    pub label: String,
    #[serde(
        default,
        alias = "extraction_confidence",
        deserialize_with = "lenient::optional_number"
    )]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedContext {
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub responsibilities: Vec<TextItem>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub constraints: Vec<TextItem>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub outcomes_metrics: Vec<TextItem>,
}

/// Context entries arrive either as strings or as `{ "text": ... }` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Plain(String),
    Described {
        #[serde(alias = "description", alias = "responsibility")]
        text: String,
    },
}

impl TextItem {
    pub fn text(&self) -> &str {
        match self {
            TextItem::Plain(text) | TextItem::Described { text } => text.trim(),
        }
    }
}

/// Raw weight from an extraction confidence: `round(clamp(confidence * 40, 5, 45))`.
fn confidence_weight(confidence: Option<f64>) -> u8 {
    let confidence = confidence.unwrap_or(FALLBACK_CONFIDENCE);
    lenient::round_clamped(confidence * 40.0, 5, 45)
}

fn scored_title(value: Option<&ScoredValue>) -> Option<String> {
    value
        .map(|scored| to_title_case(&to_snake_case(scored.value())))
        .filter(|title| !title.is_empty())
}

impl StructuredPayload {
    pub(crate) fn into_document(self, config: &RubricConfig) -> RubricDocument {
        let job_data = JobData {
            title: self.title(),
            description: self.description(),
            ..JobData::default()
        };

        let mut document = RubricDocument::new(job_data, config.default_threshold_score);
        if let Some(role_family) = &self.metadata.role_family {
            let value = role_family.value();
            if !value.is_empty() {
                document.domain = value.to_string();
            }
            document.domain_confidence = role_family
                .confidence()
                .unwrap_or(DEFAULT_DOMAIN_CONFIDENCE)
                .clamp(0.0, 1.0);
        }
        document.raw_jd_text = self.raw_jd_text.clone();

        let mut mandatory = RubricSection::new(MANDATORY_SECTION_KEY, MANDATORY_LABEL);
        for gate in &self.requirements.gates_final {
            add_extracted(
                &mut mandatory,
                &gate.label,
                GATE_IMPORTANCE,
                confidence_weight(gate.confidence),
                gate.value.clone(),
            );
        }
        for requirement in &self.requirements.must_have {
            add_extracted(
                &mut mandatory,
                &requirement.label,
                MUST_HAVE_IMPORTANCE,
                confidence_weight(requirement.extraction_confidence),
                requirement.value.clone(),
            );
        }

        let mut screening = RubricSection::new(SCREENING_SECTION_KEY, SCREENING_LABEL);
        for requirement in &self.requirements.nice_to_have {
            add_extracted(
                &mut screening,
                &requirement.label,
                NICE_TO_HAVE_IMPORTANCE,
                confidence_weight(requirement.extraction_confidence),
                requirement.value.clone(),
            );
        }

        apply_rescaled_weights(&mut mandatory.criteria);
        apply_rescaled_weights(&mut screening.criteria);
        document.sections = vec![mandatory, screening];
        document.extraction = Some(self.insights());
        document
    }

    fn title(&self) -> String {
        let parts: Vec<String> = [
            scored_title(self.metadata.seniority.as_ref()),
            scored_title(self.metadata.role_family.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            parts.join(" ")
        }
    }

    fn description(&self) -> String {
        let responsibilities: Vec<&str> = self
            .context
            .responsibilities
            .iter()
            .map(TextItem::text)
            .filter(|text| !text.is_empty())
            .take(DESCRIPTION_RESPONSIBILITIES)
            .collect();

        if responsibilities.is_empty() {
            FALLBACK_DESCRIPTION.to_string()
        } else {
            responsibilities.join(". ")
        }
    }

    fn insights(&self) -> ExtractionInsights {
        let (needs_clarification, clarification_items) = match &self.metadata.needs_clarification {
            Some(ClarificationFlag::Flag(flag)) => (*flag, Vec::new()),
            Some(ClarificationFlag::Items(items)) => (!items.is_empty(), items.clone()),
            None => (false, Vec::new()),
        };

        ExtractionInsights {
            needs_review_count: self.requirements.needs_review_count.unwrap_or(0),
            needs_clarification,
            clarification_items,
            gates: self
                .requirements
                .gates_final
                .iter()
                .map(|gate| GateSummary {
                    label: gate.label.trim().to_string(),
                    confidence: gate.confidence,
                    value: gate.value.clone(),
                })
                .collect(),
        }
    }
}

/// Appends an extracted requirement unless its derived name is empty or taken.
fn add_extracted(
    section: &mut RubricSection,
    label: &str,
    importance: u8,
    raw_weight: u8,
    value: Option<String>,
) {
    let name = to_snake_case(label);
    if name.is_empty() {
        debug!(section = %section.key, label, "skipping extracted requirement without a usable name");
        return;
    }
    if section.criterion(&name).is_some() {
        debug!(section = %section.key, %name, "skipping duplicate extracted requirement");
        return;
    }

    let criterion = Criterion::from_parts(name, label.trim().to_string(), raw_weight, importance)
        .with_value(value);
    section.push_unchecked(criterion);
}
