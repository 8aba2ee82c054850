//! Deserializers tolerant of the loose typing older backend payloads use:
//! numbers sent as strings, blank strings standing in for "absent", and
//! `null` where a collection was expected.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberLike::Number(value) => Some(*value),
            NumberLike::Text(text) => text.trim().parse::<f64>().ok(),
        }
        .filter(|value| value.is_finite())
    }
}

fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberLike>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(NumberLike::as_f64))
}

pub(crate) fn round_clamped(value: f64, min: u8, max: u8) -> u8 {
    value.round().clamp(f64::from(min), f64::from(max)) as u8
}

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

/// Salary and similar free-text fields occasionally arrive as bare numbers.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberLike>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberLike::Text(text)) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        Some(NumberLike::Number(value)) => Some(value.to_string()),
        None => None,
    })
}

pub(crate) fn percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.map_or(0, |value| round_clamped(value, 0, 100)))
}

pub(crate) fn optional_percentage<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.map(|value| round_clamped(value, 0, 100)))
}

pub(crate) fn threshold<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_percentage(deserializer)?.unwrap_or(super::DEFAULT_THRESHOLD_SCORE))
}

pub(crate) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    number(deserializer)
}

pub(crate) fn confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.map_or(super::DEFAULT_DOMAIN_CONFIDENCE, |value| value.clamp(0.0, 1.0)))
}

pub(crate) fn headcount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .map(|value| value.round().max(1.0).min(f64::from(u32::MAX)) as u32)
        .unwrap_or(1))
}

pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.map(|value| value.round().clamp(0.0, f64::from(u32::MAX)) as u32))
}

pub(crate) fn criterion_importance<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let max = super::CRITERION_IMPORTANCE_MAX;
    Ok(number(deserializer)?.map_or(super::default_importance(max), |value| {
        round_clamped(value, 0, max)
    }))
}

pub(crate) fn sub_criterion_importance<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let max = super::SUB_CRITERION_IMPORTANCE_MAX;
    Ok(number(deserializer)?.map_or(super::default_importance(max), |value| {
        round_clamped(value, 0, max)
    }))
}

/// `null` and `[]` both decode to an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a JSON object into its entries, keeping document order.
pub(crate) fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for EntriesVisitor<T>
    where
        T: Deserialize<'de>,
    {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object keyed by criterion name")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_option(EntriesVisitor(PhantomData))
}
