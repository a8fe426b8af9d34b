//! Loading of headerless table fragments from delimited text.
//!
//! Every record is a data row, rows may differ in width (the scorer validates
//! shape itself), and bytes are decoded with `encoding_rs`. A path of `-`
//! reads standard input.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::model::Table;

/// Reads every record of `reader` as a data row, decoding each field with
/// `encoding`. Undecodable bytes are an error rather than replacement text.
pub fn read_table<R: Read>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let mut table = Table::new();
    for (index, record) in reader.byte_records().enumerate() {
        let line = index + 1;
        let record = record.with_context(|| format!("Reading record {line}"))?;
        let row = record
            .iter()
            .map(|field| match encoding.decode_without_bom_handling(field) {
                (_, true) => Err(anyhow!(
                    "Record {line} is not valid {}",
                    encoding.name()
                )),
                (text, false) => Ok(text.into_owned()),
            })
            .collect::<Result<Vec<_>>>()?;
        table.push(row);
    }
    Ok(table)
}

/// Loads a table fragment from `path`, or from stdin when `path` is `-`.
///
/// Without an explicit delimiter `.tsv` files split on tabs and everything
/// else on commas. The encoding label defaults to UTF-8.
pub fn load_table(path: &Path, delimiter: Option<u8>, encoding: Option<&str>) -> Result<Table> {
    let delimiter = delimiter.unwrap_or(match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    });
    let encoding = match encoding {
        Some(label) => Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{label}'"))?,
        None => UTF_8,
    };
    let table = if path == Path::new("-") {
        read_table(std::io::stdin().lock(), delimiter, encoding)
    } else {
        let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
        read_table(BufReader::new(file), delimiter, encoding)
    }
    .with_context(|| format!("Loading table from {path:?}"))?;
    debug!(
        "Loaded {} row(s) from {:?} ({}, delimiter {:?})",
        table.len(),
        path,
        encoding.name(),
        char::from(delimiter)
    );
    Ok(table)
}
