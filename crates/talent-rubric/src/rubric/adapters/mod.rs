//! Per-shape adapters producing the canonical [`RubricDocument`].

mod basic;
mod legacy;
mod structured;

pub use basic::BasicPayload;
pub use legacy::{LegacyCriteria, LegacyEntry, LegacyPayload, LegacySubEntry};
pub use structured::{
    ClarificationFlag, ExtractedContext, ExtractedGate, ExtractedRequirement, ExtractedRequirements,
    ExtractionMetadata, ScoredValue, StructuredPayload, TextItem,
};

use serde::Serialize;
use serde_json::Value;

use super::domain::RubricDocument;
use super::shape::{PayloadKind, PayloadShape};
use super::RubricError;
use crate::config::RubricConfig;

/// Folds any supported backend payload into a canonical document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubricNormalizer {
    config: RubricConfig,
}

impl RubricNormalizer {
    pub fn new(config: RubricConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, payload: Value) -> Result<NormalizedRubric, RubricError> {
        let shape = PayloadShape::parse(payload)?;
        Ok(self.adapt(shape))
    }

    pub fn adapt(&self, shape: PayloadShape) -> NormalizedRubric {
        let source = shape.kind();
        let document = match shape {
            PayloadShape::Structured(payload) => payload.into_document(&self.config),
            PayloadShape::Basic(payload) => payload.into_document(&self.config),
            PayloadShape::Canonical(document) => document,
            PayloadShape::Legacy(payload) => payload.into_document(&self.config),
        };
        NormalizedRubric { source, document }
    }
}

/// Adapter output tagged with the shape it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRubric {
    pub source: PayloadKind,
    pub document: RubricDocument,
}

impl NormalizedRubric {
    /// Job metadata exists but the rubric itself has not been generated yet.
    ///
    /// Only a basic-analysis payload means this; an empty canonical rubric is
    /// a real (if empty) rubric.
    pub fn awaiting_generation(&self) -> bool {
        self.source == PayloadKind::BasicAnalysis && self.document.sections.is_empty()
    }

    pub fn into_document(self) -> RubricDocument {
        self.document
    }
}
