use super::common::*;
use crate::rubric::domain::{Criterion, RubricItem, SubCriterion};
use crate::rubric::{RubricError, MANDATORY_SECTION_KEY};

fn ranked_names(document: &crate::rubric::RubricDocument) -> Vec<(usize, String)> {
    document
        .section(MANDATORY_SECTION_KEY)
        .expect("mandatory section")
        .ranked()
        .map(|(priority, criterion)| (priority, criterion.name().to_string()))
        .collect()
}

#[test]
fn deleting_the_second_of_four_renumbers_priorities() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    let removed = section.remove_criterion(1).expect("removed");
    assert_eq!(removed.name(), "sql");

    assert_eq!(
        ranked_names(&document),
        vec![
            (1, "python".to_string()),
            (2, "airflow".to_string()),
            (3, "spark".to_string())
        ]
    );
}

#[test]
fn moving_a_criterion_reorders_priorities() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    section.move_criterion(3, 0).expect("moved");
    assert_eq!(section.priority_of("spark"), Some(1));
    assert_eq!(section.priority_of("python"), Some(2));
    assert_eq!(section.priority_of("airflow"), Some(4));

    let serialized = serde_json::to_value(&*section).expect("serializes");
    let priorities: Vec<u64> = serialized["criteria"]
        .as_array()
        .expect("criteria array")
        .iter()
        .map(|criterion| criterion["priority"].as_u64().expect("priority"))
        .collect();
    assert_eq!(priorities, vec![1, 2, 3, 4]);
}

#[test]
fn duplicate_names_are_rejected_after_normalization() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    match section.add_criterion("  python!! ", 5, None) {
        Err(RubricError::DuplicateName { name }) => assert_eq!(name, "python"),
        other => panic!("expected duplicate name, got {other:?}"),
    }
    assert_eq!(section.len(), 4);
}

#[test]
fn punctuation_only_names_are_rejected() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    let err = section.add_criterion("+++", 5, None).expect_err("empty name");
    assert!(matches!(err, RubricError::EmptyName { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn renaming_checks_siblings_but_not_itself() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    section.rename_criterion(0, "PYTHON").expect("same name allowed");
    assert_eq!(section.criteria()[0].display_name(), "PYTHON");

    assert!(matches!(
        section.rename_criterion(0, "Sql"),
        Err(RubricError::DuplicateName { .. })
    ));

    section.rename_criterion(0, "Python 3").expect("renamed");
    assert_eq!(section.criteria()[0].name(), "python_3");
}

#[test]
fn sub_criteria_vanish_when_the_last_is_removed() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    section
        .add_sub_criterion(0, "Pandas", 9, None)
        .expect("sub added");
    assert_eq!(section.criteria()[0].sub_criteria()[0].importance(), 5);
    assert!(matches!(
        section.add_sub_criterion(0, "pandas", 2, None),
        Err(RubricError::DuplicateName { .. })
    ));

    let serialized = serde_json::to_value(&*section).expect("serializes");
    assert!(serialized["criteria"][0]["sub_criteria"].is_array());

    section.remove_sub_criterion(0, 0).expect("sub removed");
    let serialized = serde_json::to_value(&*section).expect("serializes");
    assert!(serialized["criteria"][0]["sub_criteria"].is_null());
}

#[test]
fn moving_a_sub_criterion_reranks_its_siblings() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");
    for (label, importance) in [("Pandas", 4), ("Polars", 3), ("NumPy", 2)] {
        section
            .add_sub_criterion(0, label, importance, None)
            .expect("sub added");
    }

    section.move_sub_criterion(0, 2, 0).expect("sub moved");

    let serialized = serde_json::to_value(&*section).expect("serializes");
    let ranked: Vec<(String, u64)> = serialized["criteria"][0]["sub_criteria"]
        .as_array()
        .expect("sub-criteria array")
        .iter()
        .map(|sub| {
            (
                sub["name"].as_str().expect("name").to_string(),
                sub["priority"].as_u64().expect("priority"),
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("numpy".to_string(), 1),
            ("pandas".to_string(), 2),
            ("polars".to_string(), 3)
        ]
    );

    assert!(matches!(
        section.move_sub_criterion(0, 3, 0),
        Err(RubricError::IndexOutOfRange { index: 3, len: 3 })
    ));
    assert!(matches!(
        section.move_sub_criterion(1, 0, 0),
        Err(RubricError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn importance_edits_are_clamped_to_their_scale() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    section.set_importance(0, 0).expect("edited");
    assert_eq!(section.criteria()[0].importance(), 1);
    section.set_importance(0, 200).expect("edited");
    assert_eq!(section.criteria()[0].importance(), Criterion::MAX_IMPORTANCE);

    section.add_sub_criterion(1, "Window functions", 3, None).expect("sub added");
    section.set_sub_importance(1, 0, 9).expect("edited");
    assert_eq!(
        section.criteria()[1].sub_criteria()[0].importance(),
        SubCriterion::MAX_IMPORTANCE
    );
}

#[test]
fn out_of_range_positions_are_reported() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    assert!(matches!(
        section.remove_criterion(9),
        Err(RubricError::IndexOutOfRange { index: 9, len: 4 })
    ));
    assert!(matches!(
        section.move_criterion(0, 4),
        Err(RubricError::IndexOutOfRange { index: 4, len: 4 })
    ));
    assert!(matches!(
        section.remove_sub_criterion(0, 0),
        Err(RubricError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn values_are_trimmed_and_blank_values_cleared() {
    let mut document = draft_document();
    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");

    section
        .set_value(0, Some(" 5+ years ".to_string()))
        .expect("edited");
    assert_eq!(section.criteria()[0].value(), Some("5+ years"));
    section.set_value(0, Some(String::new())).expect("edited");
    assert!(section.criteria()[0].value().is_none());
}

#[test]
fn threshold_must_stay_within_percent_range() {
    let mut document = draft_document();
    document.set_threshold(80).expect("in range");
    assert_eq!(document.threshold_score, 80);

    for value in [-1, 101, 1_000] {
        match document.set_threshold(value) {
            Err(RubricError::ThresholdOutOfRange { value: rejected }) => {
                assert_eq!(rejected, value)
            }
            other => panic!("expected threshold error, got {other:?}"),
        }
    }
    assert_eq!(document.threshold_score, 80);
}

#[test]
fn unknown_sections_are_reported() {
    let mut document = draft_document();
    match document.section_mut("culture_fit") {
        Err(RubricError::UnknownSection { key }) => assert_eq!(key, "culture_fit"),
        other => panic!("expected unknown section, got {other:?}"),
    }
}

#[test]
fn derived_weights_follow_edits() {
    let mut document = draft_document();
    document.derive_weights();
    let weights: Vec<u8> = document.sections[0]
        .criteria()
        .iter()
        .map(|criterion| criterion.weight())
        .collect();
    // importances 8, 6, 4, 2 over 20
    assert_eq!(weights, vec![40, 30, 20, 10]);

    let section = document
        .section_mut(MANDATORY_SECTION_KEY)
        .expect("mandatory section");
    section.remove_criterion(0).expect("removed");
    document.derive_weights();
    let weights: Vec<u8> = document.sections[0]
        .criteria()
        .iter()
        .map(|criterion| criterion.weight())
        .collect();
    // 6, 4, 2 over 12: 50, 33.3, 16.7
    assert_eq!(weights, vec![50, 33, 17]);
    document.verify_weights().expect("weights sum to 100");
}
