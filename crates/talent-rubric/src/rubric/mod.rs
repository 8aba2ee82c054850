//! Canonical rubric model, payload normalization, and weight derivation.

mod adapters;
mod domain;
mod editor;
mod error;
mod lenient;
pub mod naming;
pub mod repository;
pub mod router;
pub mod service;
mod shape;
mod validation;
pub mod weights;

#[cfg(test)]
mod tests;

pub use adapters::{
    BasicPayload, ClarificationFlag, ExtractedContext, ExtractedGate, ExtractedRequirement,
    ExtractedRequirements, ExtractionMetadata, LegacyCriteria, LegacyEntry, LegacyPayload,
    LegacySubEntry, NormalizedRubric, RubricNormalizer, ScoredValue, StructuredPayload, TextItem,
};
pub use domain::{
    Criterion, ExtractionInsights, GateSummary, JobData, RubricDocument, RubricItem,
    RubricSection, SubCriterion,
};
pub use error::RubricError;
pub use repository::{JobId, RepositoryError, RubricRecord, RubricRepository};
pub use router::rubric_router;
pub use service::{RubricService, RubricServiceError};
pub use shape::{detect_shape, PayloadKind, PayloadShape};
pub use weights::{default_importance, derive_weights, rescale_to_hundred};

/// Version tag written on every persisted standalone rubric.
pub const SCHEMA_VERSION: u8 = 2;
pub const DEFAULT_THRESHOLD_SCORE: u8 = 60;
pub const DEFAULT_DOMAIN: &str = "other";
pub const DEFAULT_DOMAIN_CONFIDENCE: f64 = 0.5;
pub const CRITERION_IMPORTANCE_MAX: u8 = 10;
pub const SUB_CRITERION_IMPORTANCE_MAX: u8 = 5;

pub const MANDATORY_SECTION_KEY: &str = "mandatory_criteria";
pub const SCREENING_SECTION_KEY: &str = "screening_criteria";
