//! Human-readable rendering of a weighted comparison.

use std::fmt::Write as _;

use itertools::Itertools;

use crate::{
    column_stats::Range,
    continuity::WeightedComparison,
    report::{AnalysisReport, ColumnDateRange},
    table::{TextTable, render_key_values},
};

const BOLD_BLUE: &str = "\u{1b}[1;34m";
const BOLD_RED: &str = "\u{1b}[1;31m";
const BOLD_YELLOW: &str = "\u{1b}[1;33m";
const BOLD_GREEN: &str = "\u{1b}[1;32m";
const BOLD_MAGENTA: &str = "\u{1b}[1;35m";
const RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    colour: bool,
}

impl Printer {
    pub fn new(colour: bool) -> Self {
        Self { colour }
    }

    pub fn render(&self, comparison: &WeightedComparison) -> String {
        if comparison.header_in_table2() {
            return "Header mismatch in table 2\n".to_string();
        }
        let analysis = &comparison.analysis;
        let mut output = String::new();
        self.overview(&mut output, comparison);
        self.type_mismatches(&mut output, analysis);
        self.pattern_differences(&mut output, analysis);
        self.date_analysis(&mut output, analysis);
        self.numerical_ranges(&mut output, analysis);
        output
    }

    fn heading(&self, output: &mut String, colour: &str, title: &str) {
        if self.colour {
            let _ = writeln!(output, "\n{colour}=== {title} ==={RESET}");
        } else {
            let _ = writeln!(output, "\n=== {title} ===");
        }
    }

    fn overview(&self, output: &mut String, comparison: &WeightedComparison) {
        let overview = &comparison.analysis.table_comparison;
        self.heading(output, BOLD_BLUE, "Table Comparison Overview");
        let mismatch_percentage = overview
            .data_type_mismatch_percentage
            .map_or_else(|| "n/a".to_string(), |value| format!("{value}%"));
        output.push_str(&render_key_values([
            ("Tables Match", comparison.matches.to_string()),
            ("Match Percentage", format!("{}%", comparison.match_percentage())),
            ("Total Columns", overview.total_columns.to_string()),
            ("Header Mismatch", overview.header_mismatch.to_string()),
            ("Row Difference", overview.row_difference.to_string()),
            ("Column Match", overview.column_match.to_string()),
            ("Data Type Mismatch %", mismatch_percentage),
            ("Data Type Matches", overview.data_type_matches.to_string()),
            ("Full Match Data Type", overview.has_full_match_data_type.to_string()),
            (
                "Overall Similarity Data Type",
                format!("{}%", overview.overall_similarity_data_type),
            ),
            ("Data Type Mismatch Count", overview.data_type_mismatch_count.to_string()),
        ]));
    }

    fn type_mismatches(&self, output: &mut String, analysis: &AnalysisReport) {
        self.heading(output, BOLD_RED, "Data Type Mismatches");
        let mut table = TextTable::new(["Column", "Similarity", "Matching Types"]);
        for column in &analysis.table_comparison.data_type_mismatch_info {
            table.push_row([
                format!("Col {}", column.column),
                format!("{}%", column.similarity_percentage),
                format!("{}/{}", column.matching_types, column.total_types),
            ]);
        }
        push_table(output, &table);
    }

    fn pattern_differences(&self, output: &mut String, analysis: &AnalysisReport) {
        self.heading(output, BOLD_YELLOW, "Pattern Differences");
        let mut table = TextTable::new(["Column", "Table 1 Patterns", "Table 2 Patterns"]);
        for difference in &analysis.pattern_matching.differences {
            table.push_row([
                format!("Col {}", difference.column),
                or_dash(difference.table1_only.iter().join(", ")),
                or_dash(difference.table2_only.iter().join(", ")),
            ]);
        }
        push_table(output, &table);
    }

    fn date_analysis(&self, output: &mut String, analysis: &AnalysisReport) {
        self.heading(output, BOLD_GREEN, "Date Analysis");
        let dates = &analysis.date_analysis;
        let mut table = TextTable::new([
            "Column",
            "Table 1 Date",
            "Table 2 Date",
            "Pattern",
            "Min Delta (days)",
            "Max Delta (days)",
        ]);
        for delta in &dates.deltas {
            let find = |ranges: &[ColumnDateRange]| {
                ranges
                    .iter()
                    .find(|entry| entry.column == delta.column)
                    .map(|entry| entry.range.clone())
            };
            let (Some(left), Some(right)) = (find(&dates.columns.table1), find(&dates.columns.table2))
            else {
                continue;
            };
            table.push_row([
                format!("Col {}", delta.column),
                left.min.date().to_string(),
                right.min.date().to_string(),
                left.pattern,
                format!("{:.1}", delta.min_days),
                format!("{:.1}", delta.max_days),
            ]);
        }
        push_table(output, &table);
    }

    fn numerical_ranges(&self, output: &mut String, analysis: &AnalysisReport) {
        self.heading(output, BOLD_MAGENTA, "Numerical Range Comparison");
        let mut table = TextTable::new(["Column", "Table 1 Range", "Table 2 Range", "Avg Difference"]);
        for comparison in &analysis.numerical_analysis {
            let span = |range: Option<Range>| {
                range.map_or_else(|| "-".to_string(), |r| format!("{} - {}", r.min, r.max))
            };
            table.push_row([
                format!("Col {}", comparison.column),
                span(comparison.table1_range),
                span(comparison.table2_range),
                comparison
                    .difference
                    .map_or_else(|| "-".to_string(), |d| format!("{:.2}", d.avg)),
            ]);
        }
        push_table(output, &table);
    }
}

fn push_table(output: &mut String, table: &TextTable) {
    if table.is_empty() {
        output.push_str("(none)\n");
    } else {
        output.push_str(&table.render());
    }
}

fn or_dash(value: String) -> String {
    if value.is_empty() { "-".to_string() } else { value }
}
