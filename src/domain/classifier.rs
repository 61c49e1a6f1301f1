use std::fmt;

use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::cell::{CellValue, ParseAmountError};
use crate::domain::taxonomy::Category;

/// Header needles looked up in the first worksheet row. Matching is by
/// substring, so captions like "جمع بدهکار" still resolve.
pub const CODE_HEADER: &str = "کد کل";
pub const DEBIT_HEADER: &str = "بدهکار";
pub const CREDIT_HEADER: &str = "بستانکار";

/// A worksheet as a dense grid of cells, anchored at A1.
/// `rows[0]` is worksheet row 1 (the header row); rows below it are data.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    pub rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }
}

/// Zero-based column positions of the three ledger columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderIndex {
    pub code: usize,
    pub debit: usize,
    pub credit: usize,
}

/// Accumulated amount per category over one worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub operating_income: Decimal,
    pub administrative_expenses: Decimal,
    pub personnel_costs: Decimal,
    pub other_non_operating: Decimal,
    pub tax: Decimal,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> Decimal {
        match category {
            Category::OperatingIncome => self.operating_income,
            Category::AdministrativeExpenses => self.administrative_expenses,
            Category::PersonnelCosts => self.personnel_costs,
            Category::OtherNonOperating => self.other_non_operating,
            Category::Tax => self.tax,
        }
    }

    fn add(&mut self, category: Category, amount: Decimal) -> Result<(), ClassifyError> {
        let slot = match category {
            Category::OperatingIncome => &mut self.operating_income,
            Category::AdministrativeExpenses => &mut self.administrative_expenses,
            Category::PersonnelCosts => &mut self.personnel_costs,
            Category::OtherNonOperating => &mut self.other_non_operating,
            Category::Tax => &mut self.tax,
        };
        *slot = slot
            .checked_add(amount)
            .ok_or(ClassifyError::Overflow { category })?;
        Ok(())
    }
}

/// Locate the ledger columns in the first row of the sheet.
/// The first cell whose text contains a needle wins, scanning columns left
/// to right, so a sheet carrying both "بدهکار" and "جمع بدهکار" resolves to
/// whichever appears first.
pub fn resolve_columns(sheet: &Worksheet) -> Result<HeaderIndex, ClassifyError> {
    let header_row = sheet.rows.first().ok_or(ClassifyError::EmptySheet)?;

    let locate = |needle: &'static str| {
        header_row
            .iter()
            .position(|cell| cell.as_text().contains(needle))
            .ok_or(ClassifyError::MissingColumn(needle))
    };

    Ok(HeaderIndex {
        code: locate(CODE_HEADER)?,
        debit: locate(DEBIT_HEADER)?,
        credit: locate(CREDIT_HEADER)?,
    })
}

/// Classify every data row of the sheet and accumulate per-category totals.
///
/// Both amount cells of a row are parsed before any category matching, so a
/// malformed amount is an error even when the row's account code belongs to
/// no category. Rows whose code matches nothing contribute nothing; row
/// order never affects the result.
pub fn classify(sheet: &Worksheet) -> Result<CategoryTotals, ClassifyError> {
    let columns = resolve_columns(sheet)?;
    debug!(
        "Resolved ledger columns: code={} debit={} credit={}",
        columns.code, columns.debit, columns.credit
    );

    let mut totals = CategoryTotals::default();
    let mut matched_rows = 0usize;

    for (index, row) in sheet.rows.iter().enumerate().skip(1) {
        let worksheet_row = index + 1;
        let code = row
            .get(columns.code)
            .map(CellValue::as_text)
            .unwrap_or_default();
        let debit = amount_at(row, columns.debit, worksheet_row)?;
        let credit = amount_at(row, columns.credit, worksheet_row)?;

        for category in Category::ALL {
            if category.matches(&code) {
                let amount = category
                    .contribution(debit, credit)
                    .ok_or(ClassifyError::Overflow { category })?;
                totals.add(category, amount)?;
                matched_rows += 1;
            }
        }
    }

    info!(
        "Classified {} ledger rows, {} matched a category",
        sheet.rows.len().saturating_sub(1),
        matched_rows
    );
    Ok(totals)
}

fn amount_at(row: &[CellValue], col: usize, worksheet_row: usize) -> Result<Decimal, ClassifyError> {
    match row.get(col) {
        Some(cell) => cell.to_amount().map_err(|source| ClassifyError::BadAmount {
            row: worksheet_row,
            source,
        }),
        None => Ok(Decimal::ZERO),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    EmptySheet,
    MissingColumn(&'static str),
    BadAmount { row: usize, source: ParseAmountError },
    Overflow { category: Category },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::EmptySheet => write!(f, "worksheet has no rows"),
            ClassifyError::MissingColumn(needle) => {
                write!(f, "required header column '{}' not found in the first row", needle)
            }
            ClassifyError::BadAmount { row, source } => write!(f, "row {}: {}", row, source),
            ClassifyError::Overflow { category } => {
                write!(f, "running total for {} overflowed", category)
            }
        }
    }
}

impl std::error::Error for ClassifyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sheet(rows: &[&[&str]]) -> Worksheet {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|text| {
                        if text.is_empty() {
                            CellValue::Blank
                        } else {
                            CellValue::Text(text.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Worksheet::new(rows)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_classify_accumulates_per_category() {
        let sheet = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["4101", "", "5000"],
            &["4102", "", "2500"],
            &["6110", "1200", ""],
            &["5101", "800", ""],
            &["5201", "200", ""],
            &["7101", "300", "450"],
            &["3401", "100", ""],
            &["9999", "1", "1"],
        ]);

        let totals = classify(&sheet).unwrap();
        assert_eq!(totals.operating_income, dec("7500"));
        assert_eq!(totals.administrative_expenses, dec("1200"));
        assert_eq!(totals.personnel_costs, dec("1000"));
        assert_eq!(totals.other_non_operating, dec("150"));
        assert_eq!(totals.tax, dec("100"));
    }

    #[test]
    fn test_first_matching_header_wins() {
        // "جمع بدهکار" contains the debit needle, so the debit column
        // resolves to index 1, not the plain "بدهکار" at index 2.
        let sheet = sheet(&[
            &["کد کل", "جمع بدهکار", "بدهکار", "بستانکار"],
            &["6101", "700", "999", ""],
        ]);

        let totals = classify(&sheet).unwrap();
        assert_eq!(totals.administrative_expenses, dec("700"));
    }

    #[test]
    fn test_columns_found_by_header_not_position() {
        let sheet = sheet(&[
            &["بستانکار", "بدهکار", "کد کل"],
            &["4200", "", "4101"],
        ]);

        let totals = classify(&sheet).unwrap();
        assert_eq!(totals.operating_income, dec("4200"));
    }

    #[test]
    fn test_header_only_sheet_yields_zero_totals() {
        let sheet = sheet(&[&["کد کل", "بدهکار", "بستانکار"]]);
        assert_eq!(classify(&sheet).unwrap(), CategoryTotals::default());
    }

    #[test]
    fn test_blank_row_contributes_nothing() {
        let sheet = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["", "", ""],
            &["4101", "", "600"],
        ]);

        let totals = classify(&sheet).unwrap();
        assert_eq!(totals.operating_income, dec("600"));
    }

    #[test]
    fn test_row_order_is_irrelevant() {
        let forward = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["4101", "", "5000"],
            &["6110", "1200", ""],
        ]);
        let reversed = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["6110", "1200", ""],
            &["4101", "", "5000"],
        ]);

        assert_eq!(classify(&forward).unwrap(), classify(&reversed).unwrap());
    }

    #[test]
    fn test_bad_amount_in_unmatched_row_is_fatal() {
        // Code 9999 matches no category, but its amounts still get parsed.
        let sheet = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["9999", "abc", ""],
        ]);

        let err = classify(&sheet).unwrap_err();
        assert!(matches!(err, ClassifyError::BadAmount { row: 2, .. }));
    }

    #[test]
    fn test_thousands_separator_is_fatal() {
        let sheet = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["6110", "1,234", ""],
        ]);

        assert!(matches!(
            classify(&sheet).unwrap_err(),
            ClassifyError::BadAmount { row: 2, .. }
        ));
    }

    #[test]
    fn test_empty_sheet_is_an_error() {
        let sheet = Worksheet::default();
        assert_eq!(classify(&sheet).unwrap_err(), ClassifyError::EmptySheet);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let sheet = sheet(&[&["کد", "بدهکار", "بستانکار"]]);
        assert_eq!(
            classify(&sheet).unwrap_err(),
            ClassifyError::MissingColumn(CODE_HEADER)
        );
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let max = Decimal::MAX.to_string();
        let sheet = sheet(&[
            &["کد کل", "بدهکار", "بستانکار"],
            &["4101", "", max.as_str()],
            &["4102", "", max.as_str()],
        ]);

        assert_eq!(
            classify(&sheet).unwrap_err(),
            ClassifyError::Overflow {
                category: Category::OperatingIncome
            }
        );
    }
}
