//! CSV input for the command-line front end.
//!
//! The pipeline itself only sees [`RecordTable`] values; this module turns
//! files into them. It provides:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Skipping**: a file that cannot be read is logged and contributes no rows.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};

use crate::{data::Value, records::RecordTable};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads a delimited file into a raw table. Headers are kept as written;
/// blank cells become null.
pub fn read_table(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<RecordTable> {
    let file = File::open(path).with_context(|| format!("Opening input file {path:?}"))?;
    let mut reader = open_csv_reader(BufReader::new(file), delimiter);
    let headers = reader
        .byte_headers()
        .with_context(|| format!("Reading headers from {path:?}"))?
        .clone();
    let headers = decode_record(&headers, encoding)?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {} in {path:?}", row_idx + 2))?;
        rows.push(
            decoded
                .into_iter()
                .map(|cell| (!cell.trim().is_empty()).then_some(Value::Text(cell)))
                .collect(),
        );
    }
    Ok(RecordTable::new(headers, rows))
}

/// Reads every input, skipping the ones that fail. The returned list may be
/// shorter than `paths`.
pub fn load_tables(
    paths: &[PathBuf],
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Vec<RecordTable> {
    let mut tables = Vec::with_capacity(paths.len());
    for path in paths {
        let delimiter = resolve_input_delimiter(path, delimiter);
        match read_table(path, delimiter, encoding) {
            Ok(table) => {
                info!(
                    "Read {} row(s) from {:?} (delimiter '{}')",
                    table.len(),
                    path,
                    printable_delimiter(delimiter)
                );
                tables.push(table);
            }
            Err(err) => warn!("Skipping {path:?}: {err:#}"),
        }
    }
    tables
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
