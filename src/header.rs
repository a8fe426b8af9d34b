//! Header-row heuristic.
//!
//! A candidate row earns up to five label points per cell and is then scored
//! against the rows beneath it as plain data. A row that scores like data is
//! never a header, whatever its label points.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::{
    cell_type::detect_cell_type,
    config::ScoringOptions,
    model::{Row, column},
    scorer::score_body,
};

static TITLE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]*(?:[ _][A-Z][a-z]*)*$").expect("valid title case regex")
});
static DIGITS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid digits regex"));
static SHORT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}$").expect("valid short date regex")
});
static LOOSE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("valid email regex"));

/// Decides whether `row` is a header for `other_rows` using default options
/// and the given body-similarity threshold.
pub fn is_likely_header(row: &[String], other_rows: &[Row], match_threshold: f64) -> bool {
    is_likely_header_with(row, other_rows, &ScoringOptions::with_threshold(match_threshold))
}

/// A row with no rows beneath it is never judged a header.
pub fn is_likely_header_with(row: &[String], other_rows: &[Row], options: &ScoringOptions) -> bool {
    if row.is_empty() || other_rows.is_empty() {
        return false;
    }

    let points: usize = row
        .iter()
        .enumerate()
        .map(|(index, cell)| label_points(cell, &column(other_rows, index), options))
        .sum();
    let average = points as f64 / row.len() as f64;

    let candidate = [row.to_vec()];
    let similarity = f64::from(score_body(&candidate, other_rows, options).match_percentage);
    if similarity > options.match_threshold {
        debug!("Candidate header scores {similarity}% against the body; treating it as data");
        return false;
    }

    debug!("Candidate header averages {average:.2} label point(s) per cell");
    average > options.header_score_threshold
}

fn label_points(cell: &str, others: &[&str], options: &ScoringOptions) -> usize {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0;
    }

    let cell_type = detect_cell_type(cell);
    [
        cell.chars().count() < options.header_max_label_len,
        TITLE_CASE.is_match(cell) || cell == cell.to_uppercase(),
        others.iter().all(|other| other.trim() != cell),
        others.iter().all(|other| detect_cell_type(other) != cell_type),
        !(DIGITS_ONLY.is_match(cell) || SHORT_DATE.is_match(cell) || LOOSE_EMAIL.is_match(cell)),
    ]
    .into_iter()
    .filter(|earned| *earned)
    .count()
}
