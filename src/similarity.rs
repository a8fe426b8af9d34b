//! Similarity and distance primitives used by the field comparators.
//!
//! Vector primitives require equal lengths and report a mismatch as
//! [`LengthMismatch`](crate::error::ContinuityError::LengthMismatch). Ratios with an empty or zero
//! denominator resolve to `0.0`.

use std::{collections::HashSet, hash::Hash};

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::error::{Result, ensure_same_len};

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_same_len(a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt())
}

pub fn manhattan_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum())
}

/// `0.0` when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_same_len(a.len(), b.len())?;
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let magnitude = |values: &[f64]| values.iter().map(|v| v * v).sum::<f64>().sqrt();
    let denominator = magnitude(a) * magnitude(b);
    Ok(if denominator == 0.0 { 0.0 } else { dot / denominator })
}

/// `0.0` when either side has zero variance.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_same_len(a.len(), b.len())?;
    let n = a.len() as f64;
    let sum_a: f64 = a.iter().sum();
    let sum_b: f64 = b.iter().sum();
    let sum_ab: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let sum_a2: f64 = a.iter().map(|x| x * x).sum();
    let sum_b2: f64 = b.iter().map(|y| y * y).sum();

    let numerator = n * sum_ab - sum_a * sum_b;
    let denominator = ((n * sum_a2 - sum_a * sum_a) * (n * sum_b2 - sum_b * sum_b)).sqrt();
    Ok(if denominator == 0.0 || denominator.is_nan() {
        0.0
    } else {
        numerator / denominator
    })
}

/// Edit distance over Unicode scalar values.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=a.len()).collect();
    let mut current = vec![0; a.len() + 1];

    for (j, b_char) in b.iter().enumerate() {
        current[0] = j + 1;
        for (i, a_char) in a.iter().enumerate() {
            current[i + 1] = if a_char == b_char {
                previous[i]
            } else {
                1 + previous[i].min(previous[i + 1]).min(current[i])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[a.len()]
}

/// Intersection over union of the distinct items; `0.0` for an empty union.
pub fn jaccard_similarity<T, A, B>(a: A, b: B) -> f64
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let a: HashSet<T> = a.into_iter().collect();
    let b: HashSet<T> = b.into_iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Sørensen–Dice over character bigram sets. Strings shorter than two
/// characters fall back to exact comparison.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a_bigrams = bigrams(a);
    let b_bigrams = bigrams(b);
    if a_bigrams.is_empty() || b_bigrams.is_empty() {
        return 0.0;
    }
    let shared = a_bigrams.intersection(&b_bigrams).count();
    2.0 * shared as f64 / (a_bigrams.len() + b_bigrams.len()) as f64
}

fn bigrams(value: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = value.chars().collect();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

pub fn hamming_distance(a: &str, b: &str) -> Result<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    categorical_hamming_distance(&a, &b)
}

pub fn categorical_hamming_distance<T: PartialEq>(a: &[T], b: &[T]) -> Result<usize> {
    ensure_same_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).filter(|(x, y)| x != y).count())
}

/// Cosine similarity of the two label sets one-hot encoded over their union.
pub fn one_hot_cosine_similarity<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let a: HashSet<&T> = a.iter().collect();
    let b: HashSet<&T> = b.iter().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    // Over a 0/1 basis the dot product is the overlap and each magnitude is
    // the square root of the set size.
    let shared = a.intersection(&b).count() as f64;
    shared / ((a.len() as f64).sqrt() * (b.len() as f64).sqrt())
}

pub fn absolute_time_difference(a: NaiveDateTime, b: NaiveDateTime) -> TimeDelta {
    a.signed_duration_since(b).abs()
}

/// An absolute time difference broken down into floored units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeDifference {
    pub milliseconds: i64,
    pub seconds: i64,
    pub minutes: i64,
    pub hours: i64,
    pub days: i64,
}

pub fn relative_time_difference(a: NaiveDateTime, b: NaiveDateTime) -> TimeDifference {
    let delta = absolute_time_difference(a, b);
    TimeDifference {
        milliseconds: delta.num_milliseconds(),
        seconds: delta.num_seconds(),
        minutes: delta.num_minutes(),
        hours: delta.num_hours(),
        days: delta.num_days(),
    }
}
