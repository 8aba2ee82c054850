use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::adapters::{NormalizedRubric, RubricNormalizer};
use super::domain::RubricDocument;
use super::repository::{JobId, RepositoryError, RubricRecord, RubricRepository};
use super::{RubricError, SCHEMA_VERSION};
use crate::config::RubricConfig;

/// Normalizes incoming payloads and owns the save path for rubric documents.
pub struct RubricService<R> {
    repository: Arc<R>,
    normalizer: RubricNormalizer,
}

impl<R> RubricService<R>
where
    R: RubricRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: RubricConfig) -> Self {
        Self {
            repository,
            normalizer: RubricNormalizer::new(config),
        }
    }

    /// Converts any supported payload into the canonical document.
    pub fn normalize(&self, payload: Value) -> Result<NormalizedRubric, RubricServiceError> {
        match self.normalizer.normalize(payload) {
            Ok(normalized) => {
                debug!(
                    source = %normalized.source,
                    sections = normalized.document.sections.len(),
                    criteria = normalized.document.criterion_count(),
                    "normalized rubric payload"
                );
                Ok(normalized)
            }
            Err(err) => {
                warn!(error = %err, "rubric payload rejected");
                Err(err.into())
            }
        }
    }

    /// Recomputes weights the way a save would, without persisting.
    pub fn preview(&self, mut document: RubricDocument) -> Result<RubricDocument, RubricServiceError> {
        derive_and_verify(&mut document)?;
        Ok(document)
    }

    /// Validates, reweights, tags, and stores the document for `job_id`.
    pub fn save(
        &self,
        job_id: JobId,
        mut document: RubricDocument,
    ) -> Result<RubricRecord, RubricServiceError> {
        document.validate_for_save()?;
        derive_and_verify(&mut document)?;
        document.schema_version = Some(SCHEMA_VERSION);

        let stored = self.repository.upsert(job_id, document, Utc::now())?;
        info!(job_id = %stored.job_id, revision = stored.revision, "rubric saved");
        Ok(stored)
    }

    pub fn get(&self, job_id: &JobId) -> Result<RubricRecord, RubricServiceError> {
        let record = self
            .repository
            .fetch(job_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

fn derive_and_verify(document: &mut RubricDocument) -> Result<(), RubricError> {
    document.derive_weights();
    document.verify_weights().map_err(|err| {
        error!(error = %err, "weight derivation broke the sum-to-100 invariant");
        err
    })
}

/// Error raised by the rubric service.
#[derive(Debug, thiserror::Error)]
pub enum RubricServiceError {
    #[error(transparent)]
    Rubric(#[from] RubricError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
