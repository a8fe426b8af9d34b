//! Weighted similarity scorer, the primary continuity classifier.
//!
//! [`score`] first asks the header
//! heuristic whether table2 still starts with its own header row, and
//! [`score_body`] compares the tables as plain data. The header heuristic only
//! ever calls [`score_body`], so header detection recurses exactly one level.
//!
//! Agreement is counted in factors: one per aligned cell type, one per column
//! for shared shape patterns, two per column for date proximity and, when
//! the options count all dimensions, the range, set-overlap and
//! boolean-distribution dimensions as well.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    cell_type::{CellType, detect_cell_type},
    column_stats::{ColumnSummary, DateRange, Range, true_ratio},
    config::ScoringOptions,
    header::is_likely_header_with,
    model::{Paired, Row, column, table_width},
};

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorTally {
    pub total: usize,
    pub matching: usize,
}

impl FactorTally {
    pub fn record(&mut self, matched: bool) {
        self.total += 1;
        if matched {
            self.matching += 1;
        }
    }

    /// Rounded share of matching factors; `0` when nothing was compared.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (100.0 * self.matching as f64 / self.total as f64).round() as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub row_count: Paired<usize>,
    pub column_count: Paired<usize>,
    /// Cell types per column, top to bottom.
    pub data_types: Paired<Vec<Vec<CellType>>>,
    pub common_patterns: Vec<Vec<String>>,
    pub unique_patterns: Paired<Vec<Vec<String>>>,
    pub columns: Paired<Vec<ColumnSummary>>,
    pub factors: FactorTally,
    pub match_percentage: u8,
    pub header_in_table2: bool,
}

impl ComparisonResult {
    fn empty(table1: &[Row], table2: &[Row]) -> Self {
        Self {
            row_count: Paired::new(table1.len(), table2.len()),
            column_count: Paired::new(table_width(table1), table_width(table2)),
            ..Self::default()
        }
    }

    pub fn compared_columns(&self) -> usize {
        self.columns.table1.len()
    }
}

/// Full comparison: bails out with `header_in_table2` set when table2's first
/// row looks like a header for the rest of table2.
pub fn score(table1: &[Row], table2: &[Row], options: &ScoringOptions) -> ComparisonResult {
    let header_in_table2 = table2
        .split_first()
        .is_some_and(|(first, rest)| is_likely_header_with(first, rest, options));
    if header_in_table2 {
        debug!("First row of table2 looks like a header; skipping statistical scoring");
        return ComparisonResult {
            header_in_table2: true,
            ..ComparisonResult::empty(table1, table2)
        };
    }
    score_body(table1, table2, options)
}

/// Compares both tables as data rows without any header check.
pub fn score_body(table1: &[Row], table2: &[Row], options: &ScoringOptions) -> ComparisonResult {
    let mut result = ComparisonResult::empty(table1, table2);
    let width = result.column_count.table1.max(result.column_count.table2);

    for index in 0..width {
        let cells = Paired::new(column(table1, index), column(table2, index));
        let types = cells.map(|cells| {
            cells
                .iter()
                .map(|cell| detect_cell_type(cell))
                .collect::<Vec<_>>()
        });
        let summaries = cells.map(|cells| ColumnSummary::analyze(cells));

        let patterns1 = &summaries.table1.patterns;
        let patterns2 = &summaries.table2.patterns;
        result
            .common_patterns
            .push(patterns1.intersection(patterns2).cloned().collect());
        result
            .unique_patterns
            .table1
            .push(patterns1.difference(patterns2).cloned().collect());
        result
            .unique_patterns
            .table2
            .push(patterns2.difference(patterns1).cloned().collect());

        result.data_types.table1.push(types.table1);
        result.data_types.table2.push(types.table2);
        result.columns.table1.push(summaries.table1);
        result.columns.table2.push(summaries.table2);
    }

    result.factors = tally_factors(&result, options);
    result.match_percentage = result.factors.percentage();
    debug!(
        "Scored {} column(s): {}/{} factor(s) matched ({}%)",
        width, result.factors.matching, result.factors.total, result.match_percentage
    );
    result
}

fn tally_factors(result: &ComparisonResult, options: &ScoringOptions) -> FactorTally {
    let mut tally = FactorTally::default();

    for (types1, types2) in result.data_types.table1.iter().zip(&result.data_types.table2) {
        for (left, right) in types1.iter().zip(types2) {
            tally.record(left == right);
        }
    }

    for common in &result.common_patterns {
        tally.record(!common.is_empty());
    }

    for (left, right) in result.columns.table1.iter().zip(&result.columns.table2) {
        if let (Some(left), Some(right)) = (&left.date_range, &right.date_range) {
            compare_dates(left, right, options.date_tolerance_days, &mut tally);
        }
    }

    if options.counts_all_dimensions() {
        for (left, right) in result.columns.table1.iter().zip(&result.columns.table2) {
            compare_ranges(&left.number_range, &right.number_range, options, &mut tally);
            compare_sets(&left.email_domains, &right.email_domains, &mut tally);
            compare_booleans(left, right, options, &mut tally);
            compare_sets(&left.patterns, &right.patterns, &mut tally);
            compare_ranges(&left.percentage_range, &right.percentage_range, options, &mut tally);
            compare_ranges(&left.string_lengths, &right.string_lengths, options, &mut tally);
        }
    }

    tally
}

pub(crate) fn days_between(left: NaiveDateTime, right: NaiveDateTime) -> f64 {
    left.signed_duration_since(right).num_seconds().abs() as f64 / SECONDS_PER_DAY
}

fn compare_dates(left: &DateRange, right: &DateRange, tolerance: f64, tally: &mut FactorTally) {
    tally.record(days_between(left.min, right.min) <= tolerance);
    tally.record(days_between(left.max, right.max) <= tolerance);
}

/// Each of min, max and avg must land within a share of table1's span.
fn compare_ranges(
    left: &Option<Range>,
    right: &Option<Range>,
    options: &ScoringOptions,
    tally: &mut FactorTally,
) {
    let (Some(left), Some(right)) = (left, right) else {
        return;
    };
    let allowance = left.span() * options.range_tolerance_ratio;
    let close = |a: f64, b: f64| a == b || (a - b).abs() <= allowance;
    tally.record(close(left.min, right.min));
    tally.record(close(left.max, right.max));
    tally.record(close(left.avg, right.avg));
}

fn compare_sets(left: &BTreeSet<String>, right: &BTreeSet<String>, tally: &mut FactorTally) {
    if left.is_empty() || right.is_empty() {
        return;
    }
    tally.record(left.intersection(right).next().is_some());
}

fn compare_booleans(
    left: &ColumnSummary,
    right: &ColumnSummary,
    options: &ScoringOptions,
    tally: &mut FactorTally,
) {
    if left.boolean_distribution.is_empty() || right.boolean_distribution.is_empty() {
        return;
    }
    let delta = true_ratio(&left.boolean_distribution) - true_ratio(&right.boolean_distribution);
    tally.record(delta.abs() <= options.boolean_ratio_tolerance);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::FactorAggregation, model::table_from};

    fn all_dimensions() -> ScoringOptions {
        ScoringOptions {
            aggregation: FactorAggregation::AllDimensions,
            ..ScoringOptions::default()
        }
    }

    #[test]
    fn tally_percentage_rounds_half_up_and_guards_zero() {
        let tally = FactorTally { total: 8, matching: 5 };
        assert_eq!(tally.percentage(), 63);
        assert_eq!(FactorTally::default().percentage(), 0);
    }

    #[test]
    fn structural_factors_count_types_patterns_and_dates() {
        let table1 = table_from([vec!["11", "15/04/2025"], vec!["12", "16/04/2025"]]);
        let table2 = table_from([vec!["13", "20/04/2025"], vec!["x", "21/04/2025"]]);
        let result = score_body(&table1, &table2, &ScoringOptions::default());

        // 4 cell types (3 agree), 2 pattern sets (both overlap), 2 date bounds.
        assert_eq!(result.factors, FactorTally { total: 8, matching: 7 });
        assert_eq!(result.match_percentage, 88);
        assert_eq!(result.common_patterns[0], vec!["99".to_string()]);
        assert_eq!(result.unique_patterns.table2[0], vec!["a".to_string()]);
    }

    #[test]
    fn all_dimensions_adds_range_factors() {
        let table1 = table_from([vec!["10"], vec!["20"]]);
        let table2 = table_from([vec!["10"], vec!["21"]]);
        let structural = score_body(&table1, &table2, &ScoringOptions::default());
        let full = score_body(&table1, &table2, &all_dimensions());

        assert_eq!(structural.factors.total, 3);
        // + number range (3), pattern sets (1), percentage range (3), lengths (3).
        assert_eq!(full.factors.total, 13);
        // Max and avg drift by 1 and 0.5 against an allowance of 1.
        assert_eq!(full.factors.matching, 13);
    }

    #[test]
    fn all_dimensions_skips_empty_sets_and_distributions() {
        let table = table_from([vec!["yes", "a@x.com"], vec!["no", "b@x.com"]]);
        let other = table_from([vec!["yes", "c@y.com"], vec!["yes", "d@y.com"]]);
        let result = score_body(&table, &other, &all_dimensions());
        let booleans_and_domains = result.factors.total
            - score_body(&table, &other, &ScoringOptions::default()).factors.total;
        // Column 0: boolean distribution + pattern set + lengths (3);
        // column 1: email domains + pattern set + lengths (3).
        assert_eq!(booleans_and_domains, 10);
    }

    fn range(min: f64, max: f64, avg: f64) -> Option<Range> {
        Some(Range { min, max, avg })
    }

    fn tally_ranges(left: Option<Range>, right: Option<Range>, ratio: f64) -> FactorTally {
        let options = ScoringOptions {
            range_tolerance_ratio: ratio,
            ..ScoringOptions::default()
        };
        let mut tally = FactorTally::default();
        compare_ranges(&left, &right, &options, &mut tally);
        tally
    }

    #[test]
    fn range_allowance_is_inclusive_share_of_table1_span() {
        // Span 8 at a quarter gives an allowance of exactly 2.
        let table1 = range(0.0, 8.0, 4.0);
        assert_eq!(
            tally_ranges(table1, range(2.0, 10.0, 6.0), 0.25),
            FactorTally { total: 3, matching: 3 }
        );
        assert_eq!(
            tally_ranges(table1, range(2.5, 10.0, 6.5), 0.25),
            FactorTally { total: 3, matching: 1 }
        );
        assert_eq!(tally_ranges(table1, None, 0.25), FactorTally::default());
    }

    #[test]
    fn zero_span_ranges_only_match_exactly() {
        let table1 = range(3.0, 3.0, 3.0);
        assert_eq!(
            tally_ranges(table1, range(3.0, 3.0, 3.0), 0.1),
            FactorTally { total: 3, matching: 3 }
        );
        assert_eq!(
            tally_ranges(table1, range(2.0, 2.0, 2.0), 0.1),
            FactorTally { total: 3, matching: 0 }
        );
    }

    #[test]
    fn huge_values_still_compare_equal_to_themselves() {
        let table = table_from([vec!["1e308"], vec!["1.7e308"]]);
        let result = score_body(&table, &table, &all_dimensions());
        assert_eq!(result.factors.total, 13);
        assert_eq!(result.match_percentage, 100);

        let straddling = table_from([vec!["-1.7e308"], vec!["1.7e308"]]);
        let result = score_body(&straddling, &straddling, &all_dimensions());
        assert_eq!(result.match_percentage, 100);
    }

    #[test]
    fn boolean_factor_compares_true_ratios_inclusively() {
        let options = ScoringOptions {
            boolean_ratio_tolerance: 0.25,
            ..all_dimensions()
        };
        let all_yes = ColumnSummary::analyze(&["yes", "yes", "yes", "yes"]);
        let three_quarters = ColumnSummary::analyze(&["yes", "yes", "yes", "no"]);
        let half = ColumnSummary::analyze(&["yes", "no", "yes", "no"]);
        let mut tally = FactorTally::default();

        compare_booleans(&all_yes, &three_quarters, &options, &mut tally);
        assert_eq!(tally, FactorTally { total: 1, matching: 1 });
        compare_booleans(&all_yes, &half, &options, &mut tally);
        assert_eq!(tally, FactorTally { total: 2, matching: 1 });
    }

    #[test]
    fn opposite_boolean_columns_disagree_under_all_dimensions() {
        let table1 = table_from([vec!["yes"], vec!["yes"], vec!["yes"]]);
        let table2 = table_from([vec!["no"], vec!["no"], vec!["no"]]);
        let result = score_body(&table1, &table2, &all_dimensions());
        // Only the three cell types agree: shapes, the pattern set, the true
        // ratio and all three length bounds differ.
        assert_eq!(result.factors, FactorTally { total: 9, matching: 3 });
    }

    #[test]
    fn date_tolerance_includes_its_last_day() {
        let table1 = table_from([vec!["2025-01-01"], vec!["2025-02-01"]]);
        let within = table_from([vec!["2025-01-31"], vec!["2025-03-03"]]);
        let beyond = table_from([vec!["2025-02-01"], vec!["2025-03-04"]]);
        let options = ScoringOptions::default();

        // 2 types, 1 shared shape, 2 date bounds 30 days apart.
        let result = score_body(&table1, &within, &options);
        assert_eq!(result.factors, FactorTally { total: 5, matching: 5 });

        // Both bounds drift 31 days.
        let result = score_body(&table1, &beyond, &options);
        assert_eq!(result.factors, FactorTally { total: 5, matching: 3 });
    }

    #[test]
    fn narrower_table_cells_read_as_empty() {
        let table1 = table_from([vec!["1", "a"], vec!["2", "b"]]);
        let table2 = table_from([vec!["1"], vec!["2"]]);
        let result = score_body(&table1, &table2, &ScoringOptions::default());
        assert_eq!(result.compared_columns(), 2);
        assert_eq!(result.data_types.table2[1], vec![CellType::String, CellType::String]);
    }

    #[test]
    fn zero_width_tables_score_zero() {
        let table: Vec<Row> = vec![Vec::new()];
        let result = score_body(&table, &table, &ScoringOptions::default());
        assert_eq!(result.factors.total, 0);
        assert_eq!(result.match_percentage, 0);
    }

    #[test]
    fn header_row_short_circuits_full_score() {
        let table1 = table_from([vec!["John Doe", "30"], vec!["Jane Roe", "25"]]);
        let table2 = table_from([
            vec!["Name", "Age"],
            vec!["Bill Poe", "41"],
            vec!["Anna Loe", "38"],
        ]);
        let result = score(&table1, &table2, &ScoringOptions::default());
        assert!(result.header_in_table2);
        assert_eq!(result.factors.total, 0);
        assert!(result.columns.table1.is_empty());
        assert_eq!(result.row_count, Paired::new(2, 3));
    }
}
