use std::io::{Cursor, Write};

use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use umya_spreadsheet::HorizontalAlignmentValues;

use crate::domain::{CellValue, HorizontalAlign, OutputTable, RegionStyle};

/// Render an output table to xlsx bytes: cells first, then the sheet-wide
/// base font, then region styles on top so they win, then merges and
/// column widths.
pub fn write_statement_xlsx(table: &OutputTable) -> Result<Vec<u8>> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(&table.sheet_name)
        .map_err(|e| anyhow!("Failed to create worksheet: {}", e))?;

    for (row_index, row) in table.rows.iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            write_cell(sheet, col_index as u32 + 1, row_index as u32 + 1, cell);
        }
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            let font = sheet
                .get_style_mut((col_index as u32 + 1, row_index as u32 + 1))
                .get_font_mut();
            font.set_name(table.base_font.name);
            font.set_size(table.base_font.size);
        }
    }

    for style in &table.styles {
        apply_region_style(sheet, style);
    }

    for region in &table.merges {
        sheet.add_merge_cells(region.to_ref());
    }

    for &(column, width) in &table.column_widths {
        sheet.get_column_dimension_mut(column).set_width(width);
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
        .map_err(|e| anyhow!("Failed to serialize workbook: {}", e))?;
    Ok(cursor.into_inner())
}

fn write_cell(sheet: &mut umya_spreadsheet::Worksheet, col: u32, row: u32, cell: &CellValue) {
    match cell {
        CellValue::Blank => {}
        CellValue::Text(text) => {
            sheet.get_cell_mut((col, row)).set_value(text);
        }
        CellValue::Number(number) => {
            sheet
                .get_cell_mut((col, row))
                .set_value_number(number.to_f64().unwrap_or_default());
        }
    }
}

fn apply_region_style(sheet: &mut umya_spreadsheet::Worksheet, style: &RegionStyle) {
    for row in style.region.first_row..=style.region.last_row {
        for col in style.region.first_col..=style.region.last_col {
            let cell_style = sheet.get_style_mut((col, row));
            if let Some(argb) = style.fill_argb {
                cell_style.set_background_color(argb);
            }
            if let Some(align) = style.align {
                cell_style
                    .get_alignment_mut()
                    .set_horizontal(horizontal_value(align));
            }
            let font = cell_style.get_font_mut();
            if style.bold {
                font.set_bold(true);
            }
            if let Some(size) = style.font_size {
                font.set_size(size);
            }
            if let Some(argb) = style.font_argb {
                font.get_color_mut().set_argb(argb);
            }
        }
    }
}

fn horizontal_value(align: HorizontalAlign) -> HorizontalAlignmentValues {
    match align {
        HorizontalAlign::Center => HorizontalAlignmentValues::Center,
        HorizontalAlign::Right => HorizontalAlignmentValues::Right,
    }
}

/// Render an output table to CSV. Styling, merges and widths have no CSV
/// counterpart and are dropped; every record is padded to the table's
/// widest row so the output stays rectangular.
pub fn write_statement_csv<W: Write>(table: &OutputTable, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let width = table.rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut count = 0;
    for row in &table.rows {
        let mut record: Vec<String> = row.iter().map(CellValue::as_text).collect();
        record.resize(width, String::new());
        csv_writer.write_record(&record)?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}
