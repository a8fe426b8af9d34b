//! Per-column aggregates compared by the weighted scorer.
//!
//! Every summary is computed independently and never fails: cells that do not
//! parse for a given statistic are skipped, and a statistic with nothing to
//! aggregate is `None` (or an empty collection), never zero. Cells are trimmed
//! before analysis.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::LazyLock,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    cell_type::{CellType, detect_cell_type},
    field_type::parse_finite,
    shape::shape_pattern,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateKind {
    Date,
    DateTime,
    Time,
}

impl fmt::Display for DateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateKind::Date => "date",
            DateKind::DateTime => "datetime",
            DateKind::Time => "time",
        })
    }
}

/// One entry of the ordered date/time format catalogue. `shape` enforces the
/// exact digit widths that `format` alone would accept loosely.
#[derive(Debug)]
pub struct DatePattern {
    pub label: &'static str,
    pub kind: DateKind,
    format: &'static str,
    shape: Regex,
}

impl DatePattern {
    fn new(label: &'static str, format: &'static str, shape: &str, kind: DateKind) -> Self {
        Self {
            label,
            kind,
            format,
            shape: Regex::new(shape).expect("valid date shape regex"),
        }
    }

    /// Strictly parses `value`; time-only values are anchored on 1970-01-01.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        if !self.shape.is_match(value) {
            return None;
        }
        match self.kind {
            DateKind::Date => NaiveDate::parse_from_str(value, self.format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN)),
            DateKind::DateTime => NaiveDateTime::parse_from_str(value, self.format).ok(),
            DateKind::Time => {
                let time = NaiveTime::parse_from_str(value, self.format).ok()?;
                NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time))
            }
        }
    }
}

static DATE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    const SLASH: &str = r"^\d{2}/\d{2}/\d{4}";
    const DASH: &str = r"^\d{2}-\d{2}-\d{4}";
    const DOT: &str = r"^\d{2}\.\d{2}\.\d{4}";
    const CLOCK: &str = r" \d{2}:\d{2}:\d{2}$";
    let date = |label, format, shape: &str| DatePattern::new(label, format, &format!("{shape}$"), DateKind::Date);
    let datetime = |label, format, shape: &str| {
        DatePattern::new(label, format, &format!("{shape}{CLOCK}"), DateKind::DateTime)
    };
    vec![
        date("DD/MM/YYYY", "%d/%m/%Y", SLASH),
        date("MM/DD/YYYY", "%m/%d/%Y", SLASH),
        date("YYYY/MM/DD", "%Y/%m/%d", r"^\d{4}/\d{2}/\d{2}"),
        date("DD-MM-YYYY", "%d-%m-%Y", DASH),
        date("MM-DD-YYYY", "%m-%d-%Y", DASH),
        date("YYYY-MM-DD", "%Y-%m-%d", r"^\d{4}-\d{2}-\d{2}"),
        date("DD.MM.YYYY", "%d.%m.%Y", DOT),
        date("MM.DD.YYYY", "%m.%d.%Y", DOT),
        date("YYYY.MM.DD", "%Y.%m.%d", r"^\d{4}\.\d{2}\.\d{2}"),
        datetime("DD/MM/YYYY HH:mm:ss", "%d/%m/%Y %H:%M:%S", SLASH),
        datetime("MM/DD/YYYY HH:mm:ss", "%m/%d/%Y %H:%M:%S", SLASH),
        datetime("YYYY/MM/DD HH:mm:ss", "%Y/%m/%d %H:%M:%S", r"^\d{4}/\d{2}/\d{2}"),
        datetime("DD-MM-YYYY HH:mm:ss", "%d-%m-%Y %H:%M:%S", DASH),
        datetime("MM-DD-YYYY HH:mm:ss", "%m-%d-%Y %H:%M:%S", DASH),
        datetime("YYYY-MM-DD HH:mm:ss", "%Y-%m-%d %H:%M:%S", r"^\d{4}-\d{2}-\d{2}"),
        DatePattern::new("HH:mm:ss", "%H:%M:%S", r"^\d{2}:\d{2}:\d{2}$", DateKind::Time),
        DatePattern::new("HH:mm", "%H:%M", r"^\d{2}:\d{2}$", DateKind::Time),
        DatePattern::new(
            "h:mm A",
            "%I:%M %p",
            r"^\d{1,2}:\d{2} (?i:am|pm)$",
            DateKind::Time,
        ),
        DatePattern::new(
            "h:mm:ss A",
            "%I:%M:%S %p",
            r"^\d{1,2}:\d{2}:\d{2} (?i:am|pm)$",
            DateKind::Time,
        ),
    ]
});

/// First catalogue entry that strictly parses `value`.
pub fn detect_date_pattern(value: &str) -> Option<&'static DatePattern> {
    let value = value.trim();
    DATE_PATTERNS
        .iter()
        .find(|pattern| pattern.parse(value).is_some())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
    pub pattern: String,
    #[serde(rename = "type")]
    pub kind: DateKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Range {
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut avg = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        // Running mean stays finite for finite inputs near f64::MAX.
        for value in values {
            count += 1;
            let n = count as f64;
            avg = avg - avg / n + value / n;
            min = min.min(value);
            max = max.max(value);
        }
        (count > 0).then_some(Self { min, max, avg })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub types: BTreeSet<CellType>,
    pub patterns: BTreeSet<String>,
    pub date_range: Option<DateRange>,
    pub number_range: Option<Range>,
    pub percentage_range: Option<Range>,
    pub string_lengths: Option<Range>,
    pub email_domains: BTreeSet<String>,
    pub boolean_distribution: BTreeMap<String, usize>,
}

impl ColumnSummary {
    pub fn analyze(column: &[&str]) -> Self {
        Self {
            types: column.iter().map(|cell| detect_cell_type(cell)).collect(),
            patterns: pattern_set(column),
            date_range: date_range(column),
            number_range: number_range(column),
            percentage_range: percentage_range(column),
            string_lengths: string_lengths(column),
            email_domains: email_domains(column),
            boolean_distribution: boolean_distribution(column),
        }
    }
}

/// Detects the format from the first non-empty cell, then parses every cell
/// strictly under that single format. Cells in any other format are dropped.
pub fn date_range(column: &[&str]) -> Option<DateRange> {
    let values = column
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>();
    let pattern = detect_date_pattern(values.first()?)?;
    let parsed = values
        .iter()
        .filter_map(|value| pattern.parse(value))
        .collect::<Vec<_>>();
    debug!(
        "Date pattern {} matched {}/{} cell(s)",
        pattern.label,
        parsed.len(),
        values.len()
    );
    Some(DateRange {
        min: *parsed.iter().min()?,
        max: *parsed.iter().max()?,
        pattern: pattern.label.to_string(),
        kind: pattern.kind,
    })
}

pub fn number_range(column: &[&str]) -> Option<Range> {
    Range::from_values(column.iter().filter_map(|cell| parse_finite(cell)))
}

pub fn percentage_range(column: &[&str]) -> Option<Range> {
    Range::from_values(
        column
            .iter()
            .filter_map(|cell| parse_finite(cell.trim().trim_end_matches('%'))),
    )
}

pub fn string_lengths(column: &[&str]) -> Option<Range> {
    Range::from_values(column.iter().map(|cell| cell.trim().chars().count() as f64))
}

pub fn email_domains(column: &[&str]) -> BTreeSet<String> {
    column
        .iter()
        .filter_map(|cell| cell.trim().split('@').nth(1))
        .filter(|domain| !domain.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Counts of `yes`/`no`/`true`/`false` cells keyed by their lowercase text.
pub fn boolean_distribution(column: &[&str]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cell in column {
        let lowered = cell.trim().to_ascii_lowercase();
        if matches!(lowered.as_str(), "yes" | "no" | "true" | "false") {
            *counts.entry(lowered).or_insert(0) += 1;
        }
    }
    counts
}

/// Share of truthy (`true`/`yes`) entries; `0` for an empty distribution.
pub fn true_ratio(distribution: &BTreeMap<String, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return 0.0;
    }
    let truthy = ["true", "yes"]
        .iter()
        .filter_map(|key| distribution.get(*key))
        .sum::<usize>();
    truthy as f64 / total as f64
}

pub fn pattern_set(column: &[&str]) -> BTreeSet<String> {
    column.iter().map(|cell| shape_pattern(cell.trim())).collect()
}
