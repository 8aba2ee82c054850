use serde::Deserialize;

use crate::config::RubricConfig;
use crate::rubric::domain::{JobData, RubricDocument};
use crate::rubric::lenient;

/// Job analysis captured before a rubric has been generated.
#[derive(Debug, Clone, Deserialize)]
pub struct BasicPayload {
    pub job_data: JobData,
    pub domain: String,
    #[serde(deserialize_with = "lenient::confidence")]
    pub domain_confidence: f64,
    pub raw_jd_text: String,
    #[serde(default, deserialize_with = "lenient::optional_percentage")]
    pub threshold_score: Option<u8>,
}

impl BasicPayload {
    pub(crate) fn into_document(self, config: &RubricConfig) -> RubricDocument {
        let threshold = self
            .threshold_score
            .unwrap_or(config.default_threshold_score);
        let mut document = RubricDocument::new(self.job_data, threshold);
        document.domain = self.domain;
        document.domain_confidence = self.domain_confidence;
        document.raw_jd_text = Some(self.raw_jd_text).filter(|text| !text.trim().is_empty());
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_fill_missing_job_fields() {
        let payload: BasicPayload = serde_json::from_value(json!({
            "job_data": { "title": "Support Lead", "description": "Run the queue", "location": "" },
            "domain": "customer_support",
            "domain_confidence": 0.72,
            "raw_jd_text": "Support Lead wanted",
        }))
        .expect("decodes");

        let document = payload.into_document(&RubricConfig::default());
        assert_eq!(document.job_data.target_headcount, 1);
        assert!(document.job_data.location.is_none());
        assert!(document.job_data.salary.is_none());
        assert_eq!(document.threshold_score, 60);
        assert!(document.sections.is_empty());
        assert_eq!(document.domain, "customer_support");
        assert!(document.schema_version.is_none());
    }

    #[test]
    fn explicit_threshold_overrides_configured_default() {
        let payload: BasicPayload = serde_json::from_value(json!({
            "job_data": { "title": "Support Lead", "target_headcount": 3 },
            "domain": "customer_support",
            "domain_confidence": 0.72,
            "raw_jd_text": "Support Lead wanted",
            "threshold_score": 72.4,
        }))
        .expect("decodes");

        let document = payload.into_document(&RubricConfig {
            default_threshold_score: 50,
        });
        assert_eq!(document.threshold_score, 72);
        assert_eq!(document.job_data.target_headcount, 3);
    }
}
