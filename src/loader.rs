// 📂 TSV Loader - diff export → raw rows
// Tab-separated, header row, dynamically typed cells

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::record::RawRecord;

/// Load a diff export from disk
pub fn load_tsv(path: &Path) -> Result<Vec<RawRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open diff file: {:?}", path))?;

    read_tsv(file).with_context(|| format!("Failed to parse diff file: {:?}", path))
}

/// Read a diff export from any reader.
///
/// Rows become column-name → scalar mappings. Cells are dynamically typed:
/// empty → null, numeric → number, anything else stays a string. Short rows
/// are tolerated - absent cells surface as missing columns downstream.
pub fn read_tsv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("Failed to read header row")?
        .clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read record")?;

        // Blank lines surface as a single empty cell
        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }

        let mut row = RawRecord::new();
        for (column, cell) in headers.iter().zip(record.iter()) {
            row.insert(column.to_string(), parse_scalar(cell));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Dynamic typing for one cell
fn parse_scalar(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }

    if let Ok(int) = cell.parse::<i64>() {
        return Value::from(int);
    }

    if let Ok(float) = cell.parse::<f64>() {
        // NaN and infinities have no JSON number form; keep them as text
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }

    Value::String(cell.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
