//! Tunable knobs of the weighted scorer and header heuristic.
//!
//! Options load from YAML; any field left out keeps its default.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 60.0;

/// Which comparison dimensions feed the match percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum FactorAggregation {
    /// Cell types, shared shape patterns and date proximity only. Range,
    /// set-overlap and boolean-distribution dimensions are summarised for
    /// reporting but left out of the score.
    #[default]
    StructuralOnly,
    /// Every dimension contributes factors.
    AllDimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringOptions {
    pub match_threshold: f64,
    pub aggregation: FactorAggregation,
    pub date_tolerance_days: f64,
    pub range_tolerance_ratio: f64,
    pub boolean_ratio_tolerance: f64,
    pub header_score_threshold: f64,
    pub header_max_label_len: usize,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            aggregation: FactorAggregation::default(),
            date_tolerance_days: 30.0,
            range_tolerance_ratio: 0.1,
            boolean_ratio_tolerance: 0.1,
            header_score_threshold: 2.0,
            header_max_label_len: 30,
        }
    }
}

impl ScoringOptions {
    pub fn with_threshold(match_threshold: f64) -> Self {
        Self {
            match_threshold,
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening options file {path:?}"))?;
        let options: Self = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing options YAML {path:?}"))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml).context("Parsing options YAML")?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=100.0).contains(&self.match_threshold),
            "match_threshold must be between 0 and 100 (got {})",
            self.match_threshold
        );
        ensure!(
            self.date_tolerance_days >= 0.0,
            "date_tolerance_days cannot be negative"
        );
        ensure!(
            self.range_tolerance_ratio >= 0.0,
            "range_tolerance_ratio cannot be negative"
        );
        ensure!(
            (0.0..=1.0).contains(&self.boolean_ratio_tolerance),
            "boolean_ratio_tolerance must be between 0 and 1"
        );
        Ok(())
    }

    pub fn counts_all_dimensions(&self) -> bool {
        self.aggregation == FactorAggregation::AllDimensions
    }
}
