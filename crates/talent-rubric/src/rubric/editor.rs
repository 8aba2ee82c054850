//! In-session edits. Priorities are positional, so every insert, removal, or
//! move leaves a gap-free 1..=N ranking without extra bookkeeping.

use super::domain::{clean_value, Criterion, RubricDocument, RubricItem, RubricSection, SubCriterion};
use super::naming::criterion_name;
use super::RubricError;

fn check_index(index: usize, len: usize) -> Result<(), RubricError> {
    if index < len {
        Ok(())
    } else {
        Err(RubricError::IndexOutOfRange { index, len })
    }
}

fn ensure_unique<T: RubricItem>(
    items: &[T],
    name: &str,
    editing: Option<usize>,
) -> Result<(), RubricError> {
    let taken = items
        .iter()
        .enumerate()
        .any(|(index, item)| Some(index) != editing && item.name() == name);
    if taken {
        return Err(RubricError::DuplicateName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn clamp_importance<T: RubricItem>(importance: u8) -> u8 {
    importance.clamp(1, T::MAX_IMPORTANCE)
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), RubricError> {
    check_index(from, items.len())?;
    check_index(to, items.len())?;
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

impl RubricSection {
    /// Appends a criterion; its priority becomes `len + 1`.
    pub fn add_criterion(
        &mut self,
        display_name: &str,
        importance: u8,
        value: Option<String>,
    ) -> Result<&Criterion, RubricError> {
        let criterion = Criterion::new(display_name, importance, value)?;
        ensure_unique(&self.criteria, &criterion.name, None)?;
        self.criteria.push(criterion);
        Ok(&self.criteria[self.criteria.len() - 1])
    }

    pub fn remove_criterion(&mut self, index: usize) -> Result<Criterion, RubricError> {
        check_index(index, self.criteria.len())?;
        Ok(self.criteria.remove(index))
    }

    /// Moves the criterion at `from` so that it ends up at position `to`.
    pub fn move_criterion(&mut self, from: usize, to: usize) -> Result<(), RubricError> {
        move_item(&mut self.criteria, from, to)
    }

    pub fn rename_criterion(&mut self, index: usize, display_name: &str) -> Result<(), RubricError> {
        check_index(index, self.criteria.len())?;
        let name = criterion_name(display_name)?;
        ensure_unique(&self.criteria, &name, Some(index))?;

        let criterion = &mut self.criteria[index];
        criterion.name = name;
        criterion.display_name = display_name.trim().to_string();
        Ok(())
    }

    pub fn set_importance(&mut self, index: usize, importance: u8) -> Result<(), RubricError> {
        check_index(index, self.criteria.len())?;
        self.criteria[index].importance = clamp_importance::<Criterion>(importance);
        Ok(())
    }

    pub fn set_value(&mut self, index: usize, value: Option<String>) -> Result<(), RubricError> {
        check_index(index, self.criteria.len())?;
        self.criteria[index].value = clean_value(value);
        Ok(())
    }

    pub fn add_sub_criterion(
        &mut self,
        criterion_index: usize,
        display_name: &str,
        importance: u8,
        value: Option<String>,
    ) -> Result<&SubCriterion, RubricError> {
        check_index(criterion_index, self.criteria.len())?;
        let sub = SubCriterion::new(display_name, importance, value)?;

        let subs = &mut self.criteria[criterion_index].sub_criteria;
        ensure_unique(subs, &sub.name, None)?;
        subs.push(sub);
        Ok(&subs[subs.len() - 1])
    }

    /// Removing the last sub-criterion leaves the list absent, not empty.
    pub fn remove_sub_criterion(
        &mut self,
        criterion_index: usize,
        sub_index: usize,
    ) -> Result<SubCriterion, RubricError> {
        check_index(criterion_index, self.criteria.len())?;
        let subs = &mut self.criteria[criterion_index].sub_criteria;
        check_index(sub_index, subs.len())?;
        Ok(subs.remove(sub_index))
    }

    pub fn move_sub_criterion(
        &mut self,
        criterion_index: usize,
        from: usize,
        to: usize,
    ) -> Result<(), RubricError> {
        check_index(criterion_index, self.criteria.len())?;
        move_item(&mut self.criteria[criterion_index].sub_criteria, from, to)
    }

    pub fn set_sub_importance(
        &mut self,
        criterion_index: usize,
        sub_index: usize,
        importance: u8,
    ) -> Result<(), RubricError> {
        check_index(criterion_index, self.criteria.len())?;
        let subs = &mut self.criteria[criterion_index].sub_criteria;
        check_index(sub_index, subs.len())?;
        subs[sub_index].importance = clamp_importance::<SubCriterion>(importance);
        Ok(())
    }
}

impl RubricDocument {
    pub fn set_threshold(&mut self, value: i64) -> Result<(), RubricError> {
        let threshold = u8::try_from(value)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or(RubricError::ThresholdOutOfRange { value })?;
        self.threshold_score = threshold;
        Ok(())
    }
}
