//! Rubric normalization for job scoring templates.
//!
//! The backend has shipped several payload shapes for rubric data over time.
//! [`rubric::RubricNormalizer`] folds all of them into one canonical
//! [`rubric::RubricDocument`], and the weight deriver turns qualitative
//! importance ratings into section weights that always sum to 100.

pub mod config;
pub mod error;
pub mod rubric;
pub mod telemetry;
