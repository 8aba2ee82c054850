use super::shape::PayloadKind;

/// Failures raised while normalizing, editing, or checking a rubric.
#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("payload does not match any known rubric shape (fields: {fields})")]
    ShapeDetection { fields: String },
    #[error("{kind} payload could not be decoded: {source}")]
    MalformedPayload {
        kind: PayloadKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("a criterion named '{name}' already exists here")]
    DuplicateName { name: String },
    #[error("'{input}' has no letters or digits to build a criterion name from")]
    EmptyName { input: String },
    #[error("threshold score must be between 0 and 100, got {value}")]
    ThresholdOutOfRange { value: i64 },
    #[error("rubric has no section '{key}'")]
    UnknownSection { key: String },
    #[error("position {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("weights in '{location}' sum to {sum} instead of 100")]
    WeightInvariantViolation { location: String, sum: u32 },
}

impl RubricError {
    /// Validation problems the editing user can fix themselves.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RubricError::DuplicateName { .. }
                | RubricError::EmptyName { .. }
                | RubricError::ThresholdOutOfRange { .. }
                | RubricError::UnknownSection { .. }
                | RubricError::IndexOutOfRange { .. }
                | RubricError::MissingField { .. }
                | RubricError::InvalidField { .. }
        )
    }

    /// Backend contract drift or an internal bug; these get escalated.
    pub fn is_escalated(&self) -> bool {
        !self.is_recoverable()
    }
}
