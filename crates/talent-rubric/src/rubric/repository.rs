use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::RubricDocument;

/// Identifier of the job a rubric belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved rubric. Each save replaces the previous record for the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRecord {
    pub job_id: JobId,
    pub revision: u32,
    pub saved_at: DateTime<Utc>,
    pub document: RubricDocument,
}

impl RubricRecord {
    /// The record that follows `previous` for the same job; the first save is revision 1.
    pub fn revise(
        previous: Option<&RubricRecord>,
        job_id: JobId,
        document: RubricDocument,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id,
            revision: previous.map_or(1, |record| record.revision + 1),
            saved_at,
            document,
        }
    }
}

/// Storage abstraction so the service can be exercised without a backend.
pub trait RubricRepository: Send + Sync {
    /// Stores `document` as the next revision for `job_id`, replacing the
    /// previous one. Reading the previous revision and writing the new one
    /// must happen as a single step so concurrent saves never share a number.
    fn upsert(
        &self,
        job_id: JobId,
        document: RubricDocument,
        saved_at: DateTime<Utc>,
    ) -> Result<RubricRecord, RepositoryError>;
    fn fetch(&self, job_id: &JobId) -> Result<Option<RubricRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("rubric not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
