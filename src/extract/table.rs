//! Tabular formats rendered as whitespace-aligned text.
//!
//! CSV and XLSX both flatten to a plain table string: every column padded to
//! its widest cell, one row per line, no row index. XLSX takes every sheet in
//! workbook order.

use calamine::{Reader, Xlsx};
use std::io::Cursor;

use crate::error::ExtractError;

pub(crate) fn extract_csv(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExtractError::ParseFailed {
            format: "csv",
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    Ok(align_rows(&rows))
}

pub(crate) fn extract_xlsx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| ExtractError::ParseFailed {
            format: "xlsx",
            message: e.to_string(),
        })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sections = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ExtractError::ParseFailed {
                format: "xlsx",
                message: e.to_string(),
            })?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        let section = align_rows(&rows);
        if !section.is_empty() {
            sections.push(section);
        }
    }

    tracing::debug!(sheets = sheet_names.len(), "extracted workbook");
    Ok(sections.join("\n"))
}

/// Pad every column to its widest cell so rows line up in a monospace
/// rendering. Trailing padding on each row is trimmed.
fn align_rows(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(|row| row.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
                .collect();
            cells.join(" ").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
