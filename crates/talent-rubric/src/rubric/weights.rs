//! Importance-to-weight derivation.
//!
//! Every non-empty list of sibling criteria ends up with integer weights that
//! sum to exactly 100. Rounding drift lands on the first item holding the
//! largest raw weight, which keeps the adjustment stable across reruns.

use super::domain::{RubricDocument, RubricItem, RubricSection};
use super::RubricError;

const TOTAL_WEIGHT: i64 = 100;

/// Midpoint used when an importance rating is missing.
pub fn default_importance(max_importance: u8) -> u8 {
    (max_importance / 2).max(1)
}

/// Proportional weights for a list of importance ratings.
pub fn derive_weights(importances: &[u8]) -> Vec<u8> {
    if importances.is_empty() {
        return Vec::new();
    }

    let total_importance: u32 = importances.iter().map(|value| u32::from(*value)).sum();
    if total_importance == 0 {
        return equal_shares(importances.len());
    }

    let factor = TOTAL_WEIGHT as f64 / f64::from(total_importance);
    let mut weights: Vec<i64> = importances
        .iter()
        .map(|importance| (f64::from(*importance) * factor).round() as i64)
        .collect();
    absorb_drift(&mut weights);
    to_percentages(weights)
}

/// Rescales raw weights proportionally so they sum to 100.
///
/// An empty list, or one whose weights are all zero, is returned unchanged.
pub fn rescale_to_hundred(raw: &[u8]) -> Vec<u8> {
    let current_sum: u32 = raw.iter().map(|value| u32::from(*value)).sum();
    if raw.is_empty() || current_sum == 0 {
        return raw.to_vec();
    }

    let scale = TOTAL_WEIGHT as f64 / f64::from(current_sum);
    let mut weights: Vec<i64> = raw
        .iter()
        .map(|weight| (f64::from(*weight) * scale).round() as i64)
        .collect();
    absorb_drift(&mut weights);
    to_percentages(weights)
}

fn equal_shares(count: usize) -> Vec<u8> {
    let count = count as i64;
    let share = TOTAL_WEIGHT / count;
    let remainder = TOTAL_WEIGHT - share * count;
    (0..count)
        .map(|index| (share + i64::from(index < remainder)) as u8)
        .collect()
}

fn absorb_drift(weights: &mut [i64]) {
    let mut drift = TOTAL_WEIGHT - weights.iter().sum::<i64>();
    if drift == 0 {
        return;
    }

    // Largest first, earliest index on ties. The head item takes the whole
    // drift unless that would push it below zero.
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|a, b| weights[*b].cmp(&weights[*a]).then(a.cmp(b)));

    for index in order {
        let adjusted = (weights[index] + drift).clamp(0, TOTAL_WEIGHT);
        drift -= adjusted - weights[index];
        weights[index] = adjusted;
        if drift == 0 {
            break;
        }
    }
}

fn to_percentages(weights: Vec<i64>) -> Vec<u8> {
    weights
        .into_iter()
        .map(|weight| weight.clamp(0, TOTAL_WEIGHT) as u8)
        .collect()
}

/// Ratings above the item's scale count as the scale maximum.
pub(crate) fn apply_derived_weights<T: RubricItem>(items: &mut [T]) {
    let importances: Vec<u8> = items
        .iter()
        .map(|item| item.importance().min(T::MAX_IMPORTANCE))
        .collect();
    for (item, weight) in items.iter_mut().zip(derive_weights(&importances)) {
        item.set_weight(weight);
    }
}

pub(crate) fn apply_rescaled_weights<T: RubricItem>(items: &mut [T]) {
    let raw: Vec<u8> = items.iter().map(RubricItem::weight).collect();
    for (item, weight) in items.iter_mut().zip(rescale_to_hundred(&raw)) {
        item.set_weight(weight);
    }
}

fn weight_sum<T: RubricItem>(items: &[T]) -> u32 {
    items.iter().map(|item| u32::from(item.weight())).sum()
}

impl RubricSection {
    /// Recomputes sub-criterion weights, then criterion weights, from importance.
    pub fn derive_weights(&mut self) {
        for criterion in &mut self.criteria {
            if !criterion.sub_criteria.is_empty() {
                apply_derived_weights(&mut criterion.sub_criteria);
            }
        }
        apply_derived_weights(&mut self.criteria);
    }

    /// Checks the sum-to-100 invariant for this section and every nested list.
    pub fn verify_weights(&self) -> Result<(), RubricError> {
        if !self.criteria.is_empty() {
            let sum = weight_sum(&self.criteria);
            if sum != 100 {
                return Err(RubricError::WeightInvariantViolation {
                    location: self.key.clone(),
                    sum,
                });
            }
        }

        for criterion in &self.criteria {
            if criterion.sub_criteria.is_empty() {
                continue;
            }
            let sum = weight_sum(&criterion.sub_criteria);
            if sum != 100 {
                return Err(RubricError::WeightInvariantViolation {
                    location: format!("{}.{}", self.key, criterion.name),
                    sum,
                });
            }
        }

        Ok(())
    }
}

impl RubricDocument {
    /// Runs the weight derivation over every section; call before save or preview.
    pub fn derive_weights(&mut self) {
        for section in &mut self.sections {
            section.derive_weights();
        }
    }

    pub fn verify_weights(&self) -> Result<(), RubricError> {
        self.sections.iter().try_for_each(RubricSection::verify_weights)
    }
}
