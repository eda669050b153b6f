//! CSV export of audit history
//!
//! Writes the flat export payload from the audit API as CSV. Every cell is
//! double-quoted with embedded quotes doubled, and the column set comes
//! from the first row's keys, in server order.

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;
use std::io::Write;

use crate::api::ExportPayload;
use crate::error::{TrailError, TrailResult};

/// Write the export payload as CSV.
///
/// The header row is derived from the first record's keys; later rows are
/// projected onto that column set, with missing keys rendered as empty
/// cells. An empty payload produces an empty file rather than an error.
pub fn write_audit_csv<W: Write>(payload: &ExportPayload, writer: &mut W) -> TrailResult<()> {
    let first = match payload.data.first() {
        Some(first) => first,
        None => return Ok(()),
    };

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    let header: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    csv_writer
        .write_record(&header)
        .map_err(|e| TrailError::Export(format!("Failed to write CSV header: {}", e)))?;

    for row in &payload.data {
        let record: Vec<String> = header
            .iter()
            .map(|key| row.get(*key).map(cell_text).unwrap_or_default())
            .collect();
        csv_writer
            .write_record(&record)
            .map_err(|e| TrailError::Export(format!("Failed to write CSV row: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| TrailError::Export(format!("Failed to flush CSV output: {}", e)))?;

    Ok(())
}

/// Text form of one cell value.
///
/// Strings are written verbatim, null becomes an empty cell, and nested
/// structures fall back to their compact JSON form.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
