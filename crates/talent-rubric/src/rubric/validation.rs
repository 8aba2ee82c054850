use super::domain::RubricDocument;
use super::RubricError;

impl RubricDocument {
    /// Checks the fields a save request cannot go without.
    pub fn validate_for_save(&self) -> Result<(), RubricError> {
        if self.job_data.title.trim().is_empty() {
            return Err(RubricError::MissingField {
                field: "job_data.title",
            });
        }
        if self.job_data.description.trim().is_empty() {
            return Err(RubricError::MissingField {
                field: "job_data.description",
            });
        }
        if self.job_data.target_headcount == 0 {
            return Err(RubricError::InvalidField {
                field: "job_data.target_headcount",
                reason: "at least one hire is required".to_string(),
            });
        }
        if self.threshold_score > 100 {
            return Err(RubricError::ThresholdOutOfRange {
                value: i64::from(self.threshold_score),
            });
        }
        if !(0.0..=1.0).contains(&self.domain_confidence) {
            return Err(RubricError::InvalidField {
                field: "domain_confidence",
                reason: format!("{} is outside 0..=1", self.domain_confidence),
            });
        }
        if self.sections.iter().all(|section| section.is_empty()) {
            return Err(RubricError::MissingField {
                field: "sections.criteria",
            });
        }
        Ok(())
    }
}
