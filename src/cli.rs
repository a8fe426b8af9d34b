use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::FactorAggregation;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Decide whether OCR table fragments belong to the same table",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score how likely table B continues table A and print the analysis
    Compare(CompareArgs),
    /// Report whether the first row of a table looks like a header
    Header(HeaderArgs),
    /// Check that every column keeps the same majority field type
    Strict(StrictArgs),
    /// Print the detected type of a single value
    Detect(DetectArgs),
}

/// Options shared by every command that reads table files.
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Earlier fragment (headerless CSV, `-` for stdin)
    #[arg(short = 'a', long = "table1")]
    pub table1: PathBuf,
    /// Later fragment that may continue the first one
    #[arg(short = 'b', long = "table2")]
    pub table2: PathBuf,
    /// Minimum match percentage for the fragments to count as one table
    #[arg(short, long)]
    pub threshold: Option<f64>,
    /// YAML file with scoring options; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Which dimensions count towards the score (`all-dimensions` adds range,
    /// set and boolean-distribution factors)
    #[arg(long, value_enum)]
    pub aggregation: Option<FactorAggregation>,
    /// Emit the decision, analysis and raw result as JSON
    #[arg(long)]
    pub json: bool,
    /// Disable ANSI colours in the printed analysis
    #[arg(long = "no-color")]
    pub no_color: bool,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct HeaderArgs {
    /// Table whose first row is inspected
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Body similarity above which the row is treated as data
    #[arg(short, long, default_value_t = crate::config::DEFAULT_MATCH_THRESHOLD)]
    pub threshold: f64,
    #[command(flatten)]
    pub source: InputArgs,
}

#[derive(Debug, Args)]
pub struct StrictArgs {
    #[arg(short = 'a', long = "table1")]
    pub table1: PathBuf,
    #[arg(short = 'b', long = "table2")]
    pub table2: PathBuf,
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Cell text to classify
    pub value: String,
    /// Which type set to classify against
    #[arg(long, value_enum, default_value_t = Taxonomy::Structural)]
    pub taxonomy: Taxonomy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Taxonomy {
    /// Cell types used by the weighted scorer
    Structural,
    /// Record-field types used by the strict classifier
    Field,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
