// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Result};
use calamine::Reader;
use daftar::application::StatementService;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(StatementService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = StatementService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Ledger fixture rows as (code, debit, credit) text triples.
pub type LedgerRows<'a> = &'a [(&'a str, &'a str, &'a str)];

/// Write a ledger workbook with the standard Persian header row.
pub fn write_ledger_workbook(path: &Path, rows: LedgerRows) -> Result<()> {
    write_ledger_workbook_with_headers(path, ("کد کل", "بدهکار", "بستانکار"), rows)
}

/// Write a ledger workbook with custom header captions, data from row 2 on.
/// Empty strings are left as truly empty cells.
pub fn write_ledger_workbook_with_headers(
    path: &Path,
    headers: (&str, &str, &str),
    rows: LedgerRows,
) -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();

    set_text(sheet, 1, 1, headers.0);
    set_text(sheet, 2, 1, headers.1);
    set_text(sheet, 3, 1, headers.2);

    for (offset, (code, debit, credit)) in rows.iter().enumerate() {
        let row = offset as u32 + 2;
        set_text(sheet, 1, row, code);
        set_text(sheet, 2, row, debit);
        set_text(sheet, 3, row, credit);
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| anyhow!("Failed to write fixture workbook: {}", e))?;
    Ok(())
}

fn set_text(sheet: &mut umya_spreadsheet::Worksheet, col: u32, row: u32, text: &str) {
    if !text.is_empty() {
        sheet.get_cell_mut((col, row)).set_value(text);
    }
}

/// Read a generated xlsx artifact back into (sheet name, text grid).
pub fn read_artifact_grid(bytes: &[u8]) -> Result<(String, Vec<Vec<String>>)> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Artifact has no worksheets"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Artifact has no worksheets"))??;

    let grid = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok((sheet_name, grid))
}

fn cell_text(data: &calamine::Data) -> String {
    match data {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        other => format!("{:?}", other),
    }
}
