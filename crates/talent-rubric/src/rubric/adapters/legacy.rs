//! Adapter for pre-versioning rubrics stored as name-keyed dictionaries.

use serde::Deserialize;

use crate::config::RubricConfig;
use crate::rubric::domain::{Criterion, JobData, RubricDocument, RubricSection, SubCriterion};
use crate::rubric::naming::to_title_case;
use crate::rubric::{
    lenient, CRITERION_IMPORTANCE_MAX, MANDATORY_SECTION_KEY, SCREENING_SECTION_KEY,
};

const DEFAULT_LEGACY_WEIGHT: f64 = 30.0;
/// Legacy sub-criteria carry no importance and their weights are not
/// converted back; every one of them starts at this rating.
const LEGACY_SUB_CRITERION_IMPORTANCE: u8 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPayload {
    pub criteria: LegacyCriteria,
    #[serde(default)]
    pub job_data: Option<JobData>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub domain_confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_percentage")]
    pub threshold_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub raw_jd_text: Option<String>,
}

/// Both dictionaries, in the key order the backend serialized them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyCriteria {
    #[serde(default, deserialize_with = "lenient::ordered_entries")]
    pub mandatory_criteria: Vec<(String, LegacyEntry)>,
    #[serde(default, deserialize_with = "lenient::ordered_entries")]
    pub screening_criteria: Vec<(String, LegacyEntry)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyEntry {
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient::ordered_entries")]
    pub sub_criteria: Vec<(String, LegacySubEntry)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacySubEntry {
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::empty_string_as_none")]
    pub value: Option<String>,
}

/// Importance back-derived from a stored weight: `clamp(round(weight / 10), 1, 10)`.
fn importance_from_weight(weight: f64) -> u8 {
    lenient::round_clamped(weight / 10.0, 1, CRITERION_IMPORTANCE_MAX)
}

fn stored_weight(weight: Option<f64>) -> f64 {
    weight.unwrap_or(DEFAULT_LEGACY_WEIGHT)
}

impl LegacyPayload {
    pub(crate) fn into_document(self, config: &RubricConfig) -> RubricDocument {
        let threshold = self
            .threshold_score
            .unwrap_or(config.default_threshold_score);
        let mut document = RubricDocument::new(self.job_data.unwrap_or_default(), threshold);
        if let Some(domain) = self.domain {
            document.domain = domain;
        }
        if let Some(confidence) = self.domain_confidence {
            document.domain_confidence = confidence.clamp(0.0, 1.0);
        }
        document.raw_jd_text = self.raw_jd_text;
        document.sections = vec![
            convert_section(MANDATORY_SECTION_KEY, self.criteria.mandatory_criteria),
            convert_section(SCREENING_SECTION_KEY, self.criteria.screening_criteria),
        ];
        document
    }
}

fn convert_section(key: &str, entries: Vec<(String, LegacyEntry)>) -> RubricSection {
    let mut section = RubricSection::new(key, to_title_case(key));
    for (name, entry) in entries {
        let weight = stored_weight(entry.weight);
        let display_name = to_title_case(&name);
        let mut criterion = Criterion::from_parts(
            name,
            display_name,
            lenient::round_clamped(weight, 0, 100),
            importance_from_weight(weight),
        )
        .with_value(entry.value);

        criterion.sub_criteria = entry
            .sub_criteria
            .into_iter()
            .map(|(sub_name, sub_entry)| {
                let display_name = to_title_case(&sub_name);
                let weight = lenient::round_clamped(stored_weight(sub_entry.weight), 0, 100);
                SubCriterion::from_parts(
                    sub_name,
                    display_name,
                    weight,
                    LEGACY_SUB_CRITERION_IMPORTANCE,
                )
                .with_value(sub_entry.value)
            })
            .collect();

        section.push_unchecked(criterion);
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::RubricItem;

    fn decode(raw: &str) -> LegacyPayload {
        serde_json::from_str(raw).expect("legacy payload decodes")
    }

    #[test]
    fn importance_is_back_derived_from_weight() {
        assert_eq!(importance_from_weight(60.0), 6);
        assert_eq!(importance_from_weight(30.0), 3);
        assert_eq!(importance_from_weight(4.0), 1);
        assert_eq!(importance_from_weight(250.0), 10);
        assert_eq!(importance_from_weight(45.0), 5);
    }

    #[test]
    fn entries_keep_serialized_key_order() {
        let payload = decode(
            r#"{ "criteria": {
                "mandatory_criteria": {
                    "sql": { "weight": 20 },
                    "python_skills": { "weight": 60, "value": "5+ years" },
                    "airflow": {}
                },
                "screening_criteria": null
            } }"#,
        );
        let document = payload.into_document(&RubricConfig::default());

        let mandatory = document.section(MANDATORY_SECTION_KEY).expect("mandatory");
        let ranked: Vec<(usize, &str)> = mandatory
            .ranked()
            .map(|(priority, criterion)| (priority, criterion.name()))
            .collect();
        assert_eq!(ranked, vec![(1, "sql"), (2, "python_skills"), (3, "airflow")]);

        let airflow = mandatory.criterion("airflow").expect("airflow");
        assert_eq!(airflow.weight(), 30);
        assert_eq!(airflow.importance(), 3);
        assert_eq!(
            mandatory.criterion("python_skills").and_then(Criterion::value),
            Some("5+ years")
        );
        assert!(document
            .section(SCREENING_SECTION_KEY)
            .expect("screening")
            .is_empty());
    }

    #[test]
    fn sub_criteria_use_fixed_importance() {
        let payload = decode(
            r#"{ "criteria": {
                "mandatory_criteria": {
                    "cloud_experience": {
                        "weight": 80,
                        "sub_criteria": {
                            "aws": { "weight": 70 },
                            "gcp": { "weight": 10, "value": "nice to have" }
                        }
                    }
                },
                "screening_criteria": {}
            } }"#,
        );
        let document = payload.into_document(&RubricConfig::default());
        let cloud = document.sections[0]
            .criterion("cloud_experience")
            .expect("cloud criterion");

        assert_eq!(cloud.importance(), 8);
        let subs = cloud.sub_criteria();
        assert_eq!(subs.len(), 2);
        assert!(subs.iter().all(|sub| sub.importance() == 3));
        assert_eq!(subs[0].weight(), 70);
        assert_eq!(subs[1].display_name(), "Gcp");
        assert_eq!(subs[1].value(), Some("nice to have"));
    }

    #[test]
    fn top_level_fields_are_carried_when_present() {
        let payload = decode(
            r#"{
                "criteria": { "mandatory_criteria": {}, "screening_criteria": {} },
                "job_data": { "title": "Analyst", "description": "Numbers" },
                "domain": "finance",
                "threshold_score": 70
            }"#,
        );
        let document = payload.into_document(&RubricConfig::default());
        assert_eq!(document.job_data.title, "Analyst");
        assert_eq!(document.domain, "finance");
        assert_eq!(document.threshold_score, 70);
        assert_eq!(document.domain_confidence, 0.5);
    }
}
