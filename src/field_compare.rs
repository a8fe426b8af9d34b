//! Value-level comparators for record fields.
//!
//! Each comparator returns a similarity in `[0, 1]`. Values that cannot be
//! parsed for their type compare as `0`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    column_stats::detect_date_pattern,
    error::{Result, ensure_same_len},
    field_type::{FieldType, detect_field_type, parse_finite},
    similarity::{
        absolute_time_difference, dice_coefficient, jaccard_similarity, levenshtein_distance,
        one_hot_cosine_similarity,
    },
};

const YEAR_MILLIS: f64 = 365.0 * 24.0 * 60.0 * 60.0 * 1000.0;
const DAY_SECONDS: f64 = 86_400.0;

/// Per-type weights for [`weighted_similarity`]. Types without an entry weigh
/// `1.0`, so the default profile yields a plain mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldWeights(BTreeMap<FieldType, f64>);

impl FieldWeights {
    /// Emphasises names and emails, discounts numbers, booleans and times.
    pub fn illustrative() -> Self {
        [
            (FieldType::Name, 1.5),
            (FieldType::Email, 1.5),
            (FieldType::Date, 1.0),
            (FieldType::Category, 1.0),
            (FieldType::Number, 0.5),
            (FieldType::Text, 1.0),
            (FieldType::PhoneNumber, 1.0),
            (FieldType::Tags, 1.0),
            (FieldType::Boolean, 0.5),
            (FieldType::Timestamp, 1.0),
            (FieldType::Url, 1.0),
            (FieldType::Time, 0.5),
        ]
        .into_iter()
        .collect()
    }

    pub fn weight(&self, field_type: FieldType) -> f64 {
        self.0.get(&field_type).copied().unwrap_or(1.0)
    }

    pub fn set(&mut self, field_type: FieldType, weight: f64) {
        self.0.insert(field_type, weight);
    }
}

impl FromIterator<(FieldType, f64)> for FieldWeights {
    fn from_iter<I: IntoIterator<Item = (FieldType, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compares two values as `field_type`, or as the type detected from `left`.
pub fn compare_values(left: &str, right: &str, field_type: Option<FieldType>) -> f64 {
    let (left, right) = (left.trim(), right.trim());
    match field_type.unwrap_or_else(|| detect_field_type(left)) {
        FieldType::Id => compare_id(left, right),
        FieldType::Name => edit_similarity(left, right),
        FieldType::Date | FieldType::Timestamp => compare_date(left, right),
        FieldType::Category | FieldType::Boolean => exact(left, right),
        FieldType::Url => jaccard_similarity(left.chars(), right.chars()),
        FieldType::Email => compare_email(left, right),
        FieldType::PhoneNumber => compare_phone_number(left, right),
        FieldType::Number => compare_number(left, right),
        FieldType::Currency => compare_currency(left, right),
        FieldType::Tags => compare_tags(left, right),
        FieldType::Time | FieldType::Duration => compare_time(left, right),
        FieldType::FilePath => compare_file_name(left, right),
        FieldType::Text => compare_text(left, right),
    }
}

/// Weighted mean of [`compare_values`] over two aligned value sequences.
pub fn weighted_similarity<S: AsRef<str>>(
    left: &[S],
    right: &[S],
    weights: &FieldWeights,
    field_type: Option<FieldType>,
) -> Result<f64> {
    ensure_same_len(left.len(), right.len())?;
    let mut total = 0.0;
    let mut total_weight = 0.0;
    for (left, right) in left.iter().zip(right) {
        let (left, right) = (left.as_ref(), right.as_ref());
        let field_type = field_type.unwrap_or_else(|| detect_field_type(left));
        let weight = weights.weight(field_type);
        total += compare_values(left, right, Some(field_type)) * weight;
        total_weight += weight;
    }
    Ok(if total_weight == 0.0 { 0.0 } else { total / total_weight })
}

fn exact(left: &str, right: &str) -> f64 {
    if left == right { 1.0 } else { 0.0 }
}

/// Prefixes before the first digit must agree; the digit tails are compared
/// as character sets with separators removed.
fn compare_id(left: &str, right: &str) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let split = |value: &str| {
        let at = value.find(|c: char| c.is_ascii_digit()).unwrap_or(value.len());
        let (prefix, tail) = value.split_at(at);
        let tail: String = tail
            .chars()
            .filter(|&c| !matches!(c, '/' | '_' | '-' | '\\'))
            .collect();
        (prefix.trim().to_string(), tail)
    };
    let (left_prefix, left_tail) = split(left);
    let (right_prefix, right_tail) = split(right);
    if left_prefix != right_prefix {
        return 0.0;
    }
    jaccard_similarity(left_tail.chars(), right_tail.chars())
}

fn edit_similarity(left: &str, right: &str) -> f64 {
    let longest = left.chars().count().max(right.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(left, right) as f64 / longest as f64
}

fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    if let Some(pattern) = detect_date_pattern(value) {
        return pattern.parse(value);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Proximity within one year.
fn compare_date(left: &str, right: &str) -> f64 {
    let (Some(left), Some(right)) = (parse_instant(left), parse_instant(right)) else {
        return 0.0;
    };
    let millis = absolute_time_difference(left, right).num_milliseconds() as f64;
    1.0 - millis.min(YEAR_MILLIS) / YEAR_MILLIS
}

fn compare_email(left: &str, right: &str) -> f64 {
    let local = |value: &str| value.split('@').next().unwrap_or_default().to_string();
    jaccard_similarity(local(left).chars(), local(right).chars())
}

fn compare_phone_number(left: &str, right: &str) -> f64 {
    let digits = |value: &str| value.chars().filter(char::is_ascii_digit).collect::<String>();
    exact(&digits(left), &digits(right))
}

/// One minus the relative difference; two zeros are identical.
fn compare_number(left: &str, right: &str) -> f64 {
    let (Some(left), Some(right)) = (parse_finite(left), parse_finite(right)) else {
        return 0.0;
    };
    let largest = left.abs().max(right.abs());
    if largest == 0.0 {
        return 1.0;
    }
    (1.0 - (left - right).abs() / largest).max(0.0)
}

fn compare_currency(left: &str, right: &str) -> f64 {
    let amount = |value: &str| {
        value
            .chars()
            .filter(|&c| c.is_ascii_digit() || matches!(c, '.' | '-'))
            .collect::<String>()
    };
    compare_number(&amount(left), &amount(right))
}

fn compare_text(left: &str, right: &str) -> f64 {
    jaccard_similarity(left.chars(), right.chars())
        .max(edit_similarity(left, right))
        .max(dice_coefficient(left, right))
}

fn compare_tags(left: &str, right: &str) -> f64 {
    fn tags(value: &str) -> Vec<&str> {
        value.split(',').map(str::trim).collect()
    }
    one_hot_cosine_similarity(&tags(left), &tags(right))
}

fn seconds_of_day(value: &str) -> Option<f64> {
    let mut parts = value.split(':').map(|part| part.trim().parse::<u32>().ok());
    let hours = parts.next()??;
    let minutes = parts.next()??;
    let seconds = parts.next().unwrap_or(Some(0))?;
    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds))
}

/// Proximity within one day.
fn compare_time(left: &str, right: &str) -> f64 {
    let (Some(left), Some(right)) = (seconds_of_day(left), seconds_of_day(right)) else {
        return 0.0;
    };
    (1.0 - (left - right).abs() / DAY_SECONDS).max(0.0)
}

fn compare_file_name(left: &str, right: &str) -> f64 {
    let file_name = |value: &str| value.rsplit('/').next().unwrap_or_default().to_string();
    jaccard_similarity(file_name(left).chars(), file_name(right).chars())
}
