//! Presentation-side analysis derived from a [`ComparisonResult`].
//!
//! [`AnalysisReport::from_result`] only reads the result, so a report can be
//! rebuilt from the same result at any time and never changes the score.
//! Column numbers in the report are 1-based.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    column_stats::{DateRange, Range},
    model::Paired,
    scorer::{ComparisonResult, days_between},
};

/// Share of matching cell types a column needs to count as a type match.
const COLUMN_TYPE_MATCH_PERCENT: u8 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub table_comparison: TableComparison,
    pub pattern_matching: PatternMatching,
    pub date_analysis: DateAnalysis,
    pub numerical_analysis: Vec<RangeComparison>,
    pub distribution_analysis: Paired<Vec<DistinctCount>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableComparison {
    pub total_columns: usize,
    pub row_difference: usize,
    pub column_match: bool,
    /// table2 width minus table1 width.
    pub column_difference: i64,
    pub header_mismatch: bool,
    pub data_type_matches: usize,
    pub has_full_match_data_type: bool,
    pub overall_similarity_data_type: u8,
    pub data_type_mismatch_count: usize,
    /// `None` when no columns were compared.
    pub data_type_mismatch_percentage: Option<u8>,
    pub data_type_mismatch_info: Vec<ColumnTypeMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnTypeMatch {
    pub column: usize,
    pub similarity_percentage: u8,
    pub matches: bool,
    pub total_types: usize,
    pub matching_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatching {
    pub common: Vec<CommonPatterns>,
    pub differences: Vec<PatternDifference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonPatterns {
    pub column: usize,
    pub has_pattern: bool,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternDifference {
    pub column: usize,
    pub table1_only: Vec<String>,
    pub table2_only: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateAnalysis {
    pub columns: Paired<Vec<ColumnDateRange>>,
    pub deltas: Vec<DateDelta>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDateRange {
    pub column: usize,
    pub range: DateRange,
}

/// Signed day offsets, table2 minus table1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateDelta {
    pub column: usize,
    pub min_days: f64,
    pub max_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeComparison {
    pub column: usize,
    pub table1_range: Option<Range>,
    pub table2_range: Option<Range>,
    pub difference: Option<RangeDelta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeDelta {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctCount {
    pub column: usize,
    pub distinct_count: usize,
}

impl AnalysisReport {
    pub fn from_result(result: &ComparisonResult) -> Self {
        Self {
            table_comparison: table_comparison(result),
            pattern_matching: pattern_matching(result),
            date_analysis: date_analysis(result),
            numerical_analysis: numerical_analysis(result),
            distribution_analysis: result.columns.map(|columns| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, summary)| DistinctCount {
                        column: index + 1,
                        distinct_count: summary.boolean_distribution.len(),
                    })
                    .collect()
            }),
        }
    }
}

fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u8
}

fn column_type_matches(result: &ComparisonResult) -> Vec<ColumnTypeMatch> {
    let types = &result.data_types;
    types
        .table1
        .iter()
        .enumerate()
        .map(|(index, left)| {
            let right = types.table2.get(index).map_or(&[][..], Vec::as_slice);
            let matching_types = left.iter().zip(right).filter(|(a, b)| a == b).count();
            let similarity_percentage = percent(matching_types, left.len());
            ColumnTypeMatch {
                column: index + 1,
                similarity_percentage,
                matches: !left.is_empty() && similarity_percentage >= COLUMN_TYPE_MATCH_PERCENT,
                total_types: left.len(),
                matching_types,
            }
        })
        .collect()
}

fn table_comparison(result: &ComparisonResult) -> TableComparison {
    let columns = column_type_matches(result);
    let overall = if columns.is_empty() {
        0
    } else {
        let sum: f64 = columns.iter().map(|c| f64::from(c.similarity_percentage)).sum();
        (sum / columns.len() as f64).round() as u8
    };
    let (matched, mismatched): (Vec<_>, Vec<_>) = columns.into_iter().partition(|c| c.matches);
    let compared = matched.len() + mismatched.len();

    TableComparison {
        total_columns: result.column_count.table1,
        row_difference: result.row_count.table1.abs_diff(result.row_count.table2),
        column_match: result.column_count.table1 == result.column_count.table2,
        column_difference: result.column_count.table2 as i64 - result.column_count.table1 as i64,
        header_mismatch: result.header_in_table2,
        data_type_matches: matched.len(),
        has_full_match_data_type: compared > 0 && overall == 100,
        overall_similarity_data_type: overall,
        data_type_mismatch_count: mismatched.len(),
        data_type_mismatch_percentage: (compared > 0).then(|| percent(mismatched.len(), compared)),
        data_type_mismatch_info: mismatched,
    }
}

fn pattern_matching(result: &ComparisonResult) -> PatternMatching {
    let common = result
        .common_patterns
        .iter()
        .enumerate()
        .map(|(index, patterns)| CommonPatterns {
            column: index + 1,
            has_pattern: !patterns.is_empty(),
            patterns: patterns.clone(),
        })
        .collect();
    let unique = &result.unique_patterns;
    let differences = unique
        .table1
        .iter()
        .zip(&unique.table2)
        .enumerate()
        .filter(|(_, (left, right))| !left.is_empty() || !right.is_empty())
        .map(|(index, (left, right))| PatternDifference {
            column: index + 1,
            table1_only: left.clone(),
            table2_only: right.clone(),
        })
        .collect();
    PatternMatching { common, differences }
}

fn date_analysis(result: &ComparisonResult) -> DateAnalysis {
    let columns = result.columns.map(|summaries| {
        summaries
            .iter()
            .enumerate()
            .filter_map(|(index, summary)| {
                Some(ColumnDateRange {
                    column: index + 1,
                    range: summary.date_range.clone()?,
                })
            })
            .collect()
    });
    let deltas = result
        .columns
        .table1
        .iter()
        .zip(&result.columns.table2)
        .enumerate()
        .filter_map(|(index, (left, right))| {
            let (left, right) = (left.date_range.as_ref()?, right.date_range.as_ref()?);
            Some(DateDelta {
                column: index + 1,
                min_days: signed_days(left.min, right.min),
                max_days: signed_days(left.max, right.max),
            })
        })
        .collect();
    DateAnalysis { columns, deltas }
}

fn signed_days(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let magnitude = days_between(from, to);
    if to < from { -magnitude } else { magnitude }
}

fn numerical_analysis(result: &ComparisonResult) -> Vec<RangeComparison> {
    result
        .columns
        .table1
        .iter()
        .zip(&result.columns.table2)
        .enumerate()
        .filter(|(_, (left, right))| left.number_range.is_some() || right.number_range.is_some())
        .map(|(index, (left, right))| RangeComparison {
            column: index + 1,
            table1_range: left.number_range,
            table2_range: right.number_range,
            difference: left.number_range.zip(right.number_range).map(|(a, b)| RangeDelta {
                min: b.min - a.min,
                max: b.max - a.max,
                avg: b.avg - a.avg,
            }),
        })
        .collect()
}
