use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};

use super::lenient;
use super::naming::{criterion_name, to_title_case};
use super::{default_importance, RubricError, CRITERION_IMPORTANCE_MAX, SUB_CRITERION_IMPORTANCE_MAX};

/// Canonical rubric model shared by every payload adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricDocument {
    /// Present once the document has been persisted as a standalone rubric.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u8>,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_domain_confidence", deserialize_with = "lenient::confidence")]
    pub domain_confidence: f64,
    #[serde(default)]
    pub job_data: JobData,
    #[serde(default = "default_threshold", deserialize_with = "lenient::threshold")]
    pub threshold_score: u8,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub raw_jd_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    pub sections: Vec<RubricSection>,
    /// Read-only extraction details carried for display; never edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<ExtractionInsights>,
}

fn default_domain() -> String {
    super::DEFAULT_DOMAIN.to_string()
}

fn default_domain_confidence() -> f64 {
    super::DEFAULT_DOMAIN_CONFIDENCE
}

fn default_threshold() -> u8 {
    super::DEFAULT_THRESHOLD_SCORE
}

impl RubricDocument {
    pub fn new(job_data: JobData, threshold_score: u8) -> Self {
        Self {
            schema_version: None,
            domain: default_domain(),
            domain_confidence: default_domain_confidence(),
            job_data,
            threshold_score: threshold_score.min(100),
            raw_jd_text: None,
            sections: Vec::new(),
            extraction: None,
        }
    }

    pub fn section(&self, key: &str) -> Option<&RubricSection> {
        self.sections.iter().find(|section| section.key == key)
    }

    pub fn section_mut(&mut self, key: &str) -> Result<&mut RubricSection, RubricError> {
        self.sections
            .iter_mut()
            .find(|section| section.key == key)
            .ok_or_else(|| RubricError::UnknownSection {
                key: key.to_string(),
            })
    }

    pub fn criterion_count(&self) -> usize {
        self.sections.iter().map(|section| section.criteria.len()).sum()
    }
}

/// Job metadata captured alongside the rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text_or_number")]
    pub salary: Option<String>,
    #[serde(default = "default_headcount", deserialize_with = "lenient::headcount")]
    pub target_headcount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_ai_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_confidential: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub manual_rounds_count: Option<u32>,
}

fn default_headcount() -> u32 {
    1
}

impl Default for JobData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            location: None,
            salary: None,
            target_headcount: default_headcount(),
            voice_ai_enabled: None,
            is_confidential: None,
            manual_rounds_count: None,
        }
    }
}

/// Gate and review details preserved from a structured extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionInsights {
    #[serde(default)]
    pub needs_review_count: u32,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clarification_items: Vec<String>,
    #[serde(default)]
    pub gates: Vec<GateSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSummary {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Shared view over criteria and sub-criteria for weighting and list edits.
pub trait RubricItem {
    /// Upper bound of the importance scale for this item kind.
    const MAX_IMPORTANCE: u8;

    fn name(&self) -> &str;
    fn importance(&self) -> u8;
    fn weight(&self) -> u8;
    fn set_weight(&mut self, weight: u8);
}

/// Ordered group of criteria. Priority is the 1-based position in `criteria`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricSection {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(
        default,
        deserialize_with = "lenient::null_as_empty",
        serialize_with = "serialize_ranked"
    )]
    pub(crate) criteria: Vec<Criterion>,
}

impl RubricSection {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            criteria: Vec::new(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn criterion(&self, name: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|criterion| criterion.name == name)
    }

    /// 1-based rank of the named criterion.
    pub fn priority_of(&self, name: &str) -> Option<usize> {
        self.criteria
            .iter()
            .position(|criterion| criterion.name == name)
            .map(|index| index + 1)
    }

    /// Criteria paired with their derived priority.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &Criterion)> {
        self.criteria
            .iter()
            .enumerate()
            .map(|(index, criterion)| (index + 1, criterion))
    }

    pub(crate) fn push_unchecked(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }
}

/// One weighted requirement inside a section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "CriterionRecord")]
pub struct Criterion {
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) weight: u8,
    pub(crate) importance: u8,
    pub(crate) value: Option<String>,
    pub(crate) sub_criteria: Vec<SubCriterion>,
}

impl Criterion {
    /// Builds a criterion from a human-entered label.
    pub fn new(display_name: &str, importance: u8, value: Option<String>) -> Result<Self, RubricError> {
        let name = criterion_name(display_name)?;
        Ok(Self {
            name,
            display_name: display_name.trim().to_string(),
            weight: 0,
            importance: importance.clamp(1, CRITERION_IMPORTANCE_MAX),
            value: clean_value(value),
            sub_criteria: Vec::new(),
        })
    }

    pub(crate) fn from_parts(name: String, display_name: String, weight: u8, importance: u8) -> Self {
        Self {
            name,
            display_name,
            weight: weight.min(100),
            importance: importance.min(CRITERION_IMPORTANCE_MAX),
            value: None,
            sub_criteria: Vec::new(),
        }
    }

    pub(crate) fn with_value(mut self, value: Option<String>) -> Self {
        self.value = clean_value(value);
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn sub_criteria(&self) -> &[SubCriterion] {
        &self.sub_criteria
    }

    pub fn has_sub_criteria(&self) -> bool {
        !self.sub_criteria.is_empty()
    }
}

impl RubricItem for Criterion {
    const MAX_IMPORTANCE: u8 = CRITERION_IMPORTANCE_MAX;

    fn name(&self) -> &str {
        &self.name
    }

    fn importance(&self) -> u8 {
        self.importance
    }

    fn weight(&self) -> u8 {
        self.weight
    }

    fn set_weight(&mut self, weight: u8) {
        self.weight = weight;
    }
}

/// Second-level requirement; importance runs 1..=5 and nesting stops here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "SubCriterionRecord")]
pub struct SubCriterion {
    pub(crate) name: String,
    pub(crate) display_name: String,
    pub(crate) weight: u8,
    pub(crate) importance: u8,
    pub(crate) value: Option<String>,
}

impl SubCriterion {
    pub fn new(display_name: &str, importance: u8, value: Option<String>) -> Result<Self, RubricError> {
        let name = criterion_name(display_name)?;
        Ok(Self {
            name,
            display_name: display_name.trim().to_string(),
            weight: 0,
            importance: importance.clamp(1, SUB_CRITERION_IMPORTANCE_MAX),
            value: clean_value(value),
        })
    }

    pub(crate) fn from_parts(name: String, display_name: String, weight: u8, importance: u8) -> Self {
        Self {
            name,
            display_name,
            weight: weight.min(100),
            importance: importance.min(SUB_CRITERION_IMPORTANCE_MAX),
            value: None,
        }
    }

    pub(crate) fn with_value(mut self, value: Option<String>) -> Self {
        self.value = clean_value(value);
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl RubricItem for SubCriterion {
    const MAX_IMPORTANCE: u8 = SUB_CRITERION_IMPORTANCE_MAX;

    fn name(&self) -> &str {
        &self.name
    }

    fn importance(&self) -> u8 {
        self.importance
    }

    fn weight(&self) -> u8 {
        self.weight
    }

    fn set_weight(&mut self, weight: u8) {
        self.weight = weight;
    }
}

pub(crate) fn clean_value(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

// Wire records. Incoming `priority` is ignored: array order is authoritative.

#[derive(Deserialize)]
struct CriterionRecord {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default, deserialize_with = "lenient::percentage")]
    weight: u8,
    #[serde(
        default = "default_criterion_importance",
        deserialize_with = "lenient::criterion_importance"
    )]
    importance: u8,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    value: Option<String>,
    #[serde(default, deserialize_with = "lenient::null_as_empty")]
    sub_criteria: Vec<SubCriterion>,
}

#[derive(Deserialize)]
struct SubCriterionRecord {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default, deserialize_with = "lenient::percentage")]
    weight: u8,
    #[serde(
        default = "default_sub_criterion_importance",
        deserialize_with = "lenient::sub_criterion_importance"
    )]
    importance: u8,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    value: Option<String>,
}

fn default_criterion_importance() -> u8 {
    default_importance(CRITERION_IMPORTANCE_MAX)
}

fn default_sub_criterion_importance() -> u8 {
    default_importance(SUB_CRITERION_IMPORTANCE_MAX)
}

fn display_or_title(display_name: String, name: &str) -> String {
    let trimmed = display_name.trim();
    if trimmed.is_empty() {
        to_title_case(name)
    } else {
        trimmed.to_string()
    }
}

impl From<CriterionRecord> for Criterion {
    fn from(record: CriterionRecord) -> Self {
        let display_name = display_or_title(record.display_name, &record.name);
        Self {
            name: record.name,
            display_name,
            weight: record.weight,
            importance: record.importance,
            value: record.value,
            sub_criteria: record.sub_criteria,
        }
    }
}

impl From<SubCriterionRecord> for SubCriterion {
    fn from(record: SubCriterionRecord) -> Self {
        let display_name = display_or_title(record.display_name, &record.name);
        Self {
            name: record.name,
            display_name,
            weight: record.weight,
            importance: record.importance,
            value: record.value,
        }
    }
}

#[derive(Serialize)]
struct RankedCriterion<'a> {
    name: &'a str,
    display_name: &'a str,
    weight: u8,
    importance: u8,
    priority: usize,
    value: Option<&'a str>,
    sub_criteria: Option<Vec<RankedSubCriterion<'a>>>,
}

#[derive(Serialize)]
struct RankedSubCriterion<'a> {
    name: &'a str,
    display_name: &'a str,
    weight: u8,
    importance: u8,
    priority: usize,
    value: Option<&'a str>,
}

fn serialize_ranked<S>(criteria: &[Criterion], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(criteria.len()))?;
    for (index, criterion) in criteria.iter().enumerate() {
        let sub_criteria = if criterion.sub_criteria.is_empty() {
            None
        } else {
            Some(
                criterion
                    .sub_criteria
                    .iter()
                    .enumerate()
                    .map(|(sub_index, sub)| RankedSubCriterion {
                        name: &sub.name,
                        display_name: &sub.display_name,
                        weight: sub.weight,
                        importance: sub.importance,
                        priority: sub_index + 1,
                        value: sub.value.as_deref(),
                    })
                    .collect(),
            )
        };

        seq.serialize_element(&RankedCriterion {
            name: &criterion.name,
            display_name: &criterion.display_name,
            weight: criterion.weight,
            importance: criterion.importance,
            priority: index + 1,
            value: criterion.value.as_deref(),
            sub_criteria,
        })?;
    }
    seq.end()
}
