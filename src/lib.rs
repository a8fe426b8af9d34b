pub mod cell_type;
pub mod cli;
pub mod column_stats;
pub mod config;
pub mod continuity;
pub mod error;
pub mod field_compare;
pub mod field_type;
pub mod header;
pub mod io_utils;
pub mod model;
pub mod printer;
pub mod report;
pub mod scorer;
pub mod shape;
pub mod similarity;
pub mod strict;
pub mod table;

use std::{
    env,
    io::{IsTerminal, stdout},
    path::Path,
    sync::OnceLock,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cell_type::detect_cell_type,
    cli::{Cli, Commands, InputArgs, Taxonomy},
    config::ScoringOptions,
    continuity::compare_tables_weighted,
    field_type::detect_field_type,
    header::is_likely_header,
    model::Table,
    printer::Printer,
    strict::is_strict_continuation,
};

pub use crate::{
    continuity::WeightedComparison,
    error::ContinuityError,
    model::{Paired, Row},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("table_continuity", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Compare(args) => handle_compare(&args),
        Commands::Header(args) => handle_header(&args),
        Commands::Strict(args) => handle_strict(&args),
        Commands::Detect(args) => {
            match args.taxonomy {
                Taxonomy::Structural => println!("{}", detect_cell_type(&args.value)),
                Taxonomy::Field => println!("{}", detect_field_type(&args.value)),
            }
            Ok(())
        }
    }
}

fn load(path: &Path, input: &InputArgs) -> Result<Table> {
    io_utils::load_table(path, input.delimiter, input.input_encoding.as_deref())
}

fn handle_compare(args: &cli::CompareArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => ScoringOptions::load(path)
            .with_context(|| format!("Loading scoring options from {path:?}"))?,
        None => ScoringOptions::default(),
    };
    if let Some(threshold) = args.threshold {
        options.match_threshold = threshold;
    }
    if let Some(aggregation) = args.aggregation {
        options.aggregation = aggregation;
    }
    options.validate()?;

    let table1 = load(&args.table1, &args.input)?;
    let table2 = load(&args.table2, &args.input)?;
    info!(
        "Comparing {:?} ({} row(s)) with {:?} ({} row(s))",
        args.table1,
        table1.len(),
        args.table2,
        table2.len()
    );

    let comparison = compare_tables_weighted(&table1, &table2, &options)
        .with_context(|| format!("Comparing {:?} with {:?}", args.table1, args.table2))?;
    info!(
        "Match {}% against threshold {}: {}",
        comparison.match_percentage(),
        options.match_threshold,
        if comparison.matches { "continuation" } else { "distinct" }
    );

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&comparison).context("Serializing comparison to JSON")?;
        println!("{rendered}");
    } else {
        let colour = !args.no_color && stdout().is_terminal();
        print!("{}", Printer::new(colour).render(&comparison));
    }
    Ok(())
}

fn handle_header(args: &cli::HeaderArgs) -> Result<()> {
    let table = load(&args.input, &args.source)?;
    let Some((first, rest)) = table.split_first() else {
        anyhow::bail!("{:?} has no rows", args.input);
    };
    let verdict = if is_likely_header(first, rest, args.threshold) {
        "header"
    } else {
        "data"
    };
    info!("First row of {:?} classified as {verdict}", args.input);
    println!("{verdict}");
    Ok(())
}

fn handle_strict(args: &cli::StrictArgs) -> Result<()> {
    let table1 = load(&args.table1, &args.input)?;
    let table2 = load(&args.table2, &args.input)?;
    let verdict = if is_strict_continuation(&table1, &table2) {
        "continuation"
    } else {
        "distinct"
    };
    info!("Strict check of {:?} and {:?}: {verdict}", args.table1, args.table2);
    println!("{verdict}");
    Ok(())
}
