use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use chrono::{DateTime, Utc};
use axum::response::Response;
use serde_json::{json, Value};

use crate::config::RubricConfig;
use crate::rubric::domain::{JobData, RubricDocument, RubricSection};
use crate::rubric::repository::{JobId, RepositoryError, RubricRecord, RubricRepository};
use crate::rubric::service::RubricService;
use crate::rubric::{MANDATORY_SECTION_KEY, SCREENING_SECTION_KEY};

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<JobId, RubricRecord>>>,
}

impl RubricRepository for MemoryRepository {
    fn upsert(
        &self,
        job_id: JobId,
        document: RubricDocument,
        saved_at: DateTime<Utc>,
    ) -> Result<RubricRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = RubricRecord::revise(guard.get(&job_id), job_id, document, saved_at);
        guard.insert(record.job_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, job_id: &JobId) -> Result<Option<RubricRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

pub(super) struct UnavailableRepository;

impl RubricRepository for UnavailableRepository {
    fn upsert(
        &self,
        _job_id: JobId,
        _document: RubricDocument,
        _saved_at: DateTime<Utc>,
    ) -> Result<RubricRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("primary down".to_string()))
    }

    fn fetch(&self, _job_id: &JobId) -> Result<Option<RubricRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("primary down".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<RubricService<MemoryRepository>>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = Arc::new(RubricService::new(
        Arc::new(repository.clone()),
        RubricConfig::default(),
    ));
    (service, repository)
}

pub(super) fn job_data() -> JobData {
    JobData {
        title: "Senior Data Engineer".to_string(),
        description: "Build and run the analytics platform".to_string(),
        location: Some("Remote".to_string()),
        ..JobData::default()
    }
}

/// Two sections, four mandatory criteria, weights not yet derived.
pub(super) fn draft_document() -> RubricDocument {
    let mut document = RubricDocument::new(job_data(), 65);

    let mut mandatory = RubricSection::new(MANDATORY_SECTION_KEY, "Must-Have Requirements");
    for (label, importance) in [("Python", 8), ("SQL", 6), ("Airflow", 4), ("Spark", 2)] {
        mandatory
            .add_criterion(label, importance, None)
            .expect("criterion added");
    }

    let mut screening = RubricSection::new(SCREENING_SECTION_KEY, "Preferred Qualifications");
    screening
        .add_criterion("dbt", 3, Some("any production use".to_string()))
        .expect("criterion added");

    document.sections = vec![mandatory, screening];
    document
}

pub(super) fn legacy_payload() -> Value {
    json!({
        "criteria": {
            "mandatory_criteria": { "python_skills": { "weight": 60 } },
            "screening_criteria": {}
        }
    })
}

pub(super) fn structured_payload() -> Value {
    json!({
        "metadata": {
            "role_family": { "value": "data_engineer", "confidence": 0.9 },
            "seniority": { "value": "senior", "confidence": 0.8 }
        },
        "requirements": {
            "must_have": [{ "requirement": "Python", "extraction_confidence": 0.7 }],
            "nice_to_have": [{ "requirement": "dbt", "extraction_confidence": 0.4 }],
            "gates_final": [{ "gate": "US work authorization", "confidence": 0.95 }],
            "needs_review_count": 1
        },
        "context": { "responsibilities": ["Own the warehouse"] },
        "raw_jd_text": "Senior Data Engineer wanted"
    })
}

pub(super) fn basic_payload() -> Value {
    json!({
        "job_data": { "title": "Data Engineer", "description": "Pipelines" },
        "domain": "data_engineering",
        "domain_confidence": 0.77,
        "raw_jd_text": "Data Engineer wanted"
    })
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
