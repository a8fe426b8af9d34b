//! Entry point of the weighted continuity check.

use log::debug;
use serde::Serialize;

use crate::{
    config::ScoringOptions,
    error::Result,
    model::{Row, ensure_non_empty, ensure_rectangular},
    report::AnalysisReport,
    scorer::{ComparisonResult, score},
};

/// Outcome of [`compare_tables_weighted`]. `analysis` is derived from
/// `result` and never feeds back into `matches`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedComparison {
    pub matches: bool,
    pub result: ComparisonResult,
    pub analysis: AnalysisReport,
}

impl WeightedComparison {
    pub fn match_percentage(&self) -> u8 {
        self.result.match_percentage
    }

    pub fn header_in_table2(&self) -> bool {
        self.result.header_in_table2
    }
}

/// Decides whether `table2` continues `table1`.
///
/// Both tables need at least one row and a uniform row width. When table2
/// still starts with its own header row the fragments never match.
pub fn compare_tables_weighted(
    table1: &[Row],
    table2: &[Row],
    options: &ScoringOptions,
) -> Result<WeightedComparison> {
    ensure_non_empty(table1, "table1")?;
    ensure_non_empty(table2, "table2")?;
    ensure_rectangular(table1, "table1")?;
    ensure_rectangular(table2, "table2")?;

    let result = score(table1, table2, options);
    let matches =
        !result.header_in_table2 && f64::from(result.match_percentage) >= options.match_threshold;
    debug!(
        "Continuity decision: matches={matches} at {}% (threshold {})",
        result.match_percentage, options.match_threshold
    );
    let analysis = AnalysisReport::from_result(&result);
    Ok(WeightedComparison {
        matches,
        result,
        analysis,
    })
}
