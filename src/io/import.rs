use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::{CellValue, Worksheet};

/// Read the first worksheet of a spreadsheet file into a cell grid.
/// The format (xlsx, xls, ods) is sniffed from the file contents.
pub fn read_ledger_file(path: &Path) -> Result<Worksheet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;
    first_sheet_grid(&mut workbook)
}

/// Read the first worksheet of an in-memory spreadsheet into a cell grid.
pub fn read_ledger_bytes(bytes: &[u8]) -> Result<Worksheet> {
    let cursor = Cursor::new(bytes);
    let mut workbook =
        open_workbook_auto_from_rs(cursor).context("Failed to open workbook from bytes")?;
    first_sheet_grid(&mut workbook)
}

fn first_sheet_grid<RS: Read + Seek>(workbook: &mut calamine::Sheets<RS>) -> Result<Worksheet> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook has no worksheets"))?
        .context("Failed to read the first worksheet")?;
    Ok(grid_from_range(&range))
}

/// Densify a used range into a grid anchored at A1, so that index 0 is
/// worksheet row 1 regardless of where the used range starts.
fn grid_from_range(range: &Range<Data>) -> Worksheet {
    let Some((end_row, end_col)) = range.end() else {
        return Worksheet::default();
    };

    let mut rows = Vec::with_capacity(end_row as usize + 1);
    for row in 0..=end_row {
        let mut cells = Vec::with_capacity(end_col as usize + 1);
        for col in 0..=end_col {
            let cell = range
                .get_value((row, col))
                .map(cell_from_data)
                .unwrap_or(CellValue::Blank);
            cells.push(cell);
        }
        rows.push(cells);
    }
    Worksheet::new(rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Blank,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => match Decimal::from_f64(*f) {
            Some(d) => CellValue::Number(d),
            None => CellValue::Text(f.to_string()),
        },
        Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => CellValue::Text(excel_serial_to_text(dt.as_f64())),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(format!("#ERROR:{:?}", e)),
    }
}

/// Render an Excel serial date as "YYYY-MM-DD", falling back to the raw
/// serial when it lies outside the representable date range.
fn excel_serial_to_text(serial: f64) -> String {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .zip(Duration::try_days(serial as i64))
        .and_then(|(base, days)| base.checked_add_signed(days))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| serial.to_string())
}
