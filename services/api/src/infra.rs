use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use talent_rubric::rubric::{
    JobId, RepositoryError, RubricDocument, RubricRecord, RubricRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local rubric store; saved rubrics do not survive a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRubricRepository {
    records: Arc<Mutex<HashMap<JobId, RubricRecord>>>,
}

impl InMemoryRubricRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<JobId, RubricRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("rubric store lock poisoned".to_string()))
    }
}

impl RubricRepository for InMemoryRubricRepository {
    fn upsert(
        &self,
        job_id: JobId,
        document: RubricDocument,
        saved_at: DateTime<Utc>,
    ) -> Result<RubricRecord, RepositoryError> {
        let mut guard = self.records()?;
        let record = RubricRecord::revise(guard.get(&job_id), job_id, document, saved_at);
        guard.insert(record.job_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, job_id: &JobId) -> Result<Option<RubricRecord>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(job_id).cloned())
    }
}
