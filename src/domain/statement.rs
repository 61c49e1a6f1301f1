use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::cell::CellValue;
use crate::domain::classifier::CategoryTotals;
use crate::domain::taxonomy::Category;

pub const STATEMENT_TITLE: &str = "صورت مالی هوشمند";
pub const SHEET_NAME: &str = "سود و زیان";
pub const COLUMN_HEADERS: [&str; 3] = ["ردیف", "شرح", "مبلغ"];

pub const LABEL_EXCESS_BEFORE_OTHER: &str = "مازاد (کسری) درآمد بر هزینه";
pub const LABEL_EXCESS_BEFORE_TAX: &str = "مازاد درآمد و هزینه قبل از مالیات";
pub const LABEL_NET_EXCESS: &str = "خالص مازاد درآمد بر هزینه";

pub const BASE_FONT_NAME: &str = "Tahoma";
pub const BASE_FONT_SIZE: f64 = 11.0;
pub const TITLE_FONT_SIZE: f64 = 14.0;
pub const HEADER_FILL_ARGB: &str = "FF6F42C1";
pub const HEADER_FONT_ARGB: &str = "FFFFFFFF";

/// The composed income statement: category totals plus the three derived
/// running results.
#[derive(Debug, Clone, Serialize)]
pub struct FinancialStatement {
    pub totals: CategoryTotals,
    /// Operating income minus administrative and personnel costs.
    pub excess_before_other: Decimal,
    /// Excess before other items plus the non-operating net.
    pub excess_before_tax: Decimal,
    /// Excess before tax minus tax.
    pub net_excess: Decimal,
}

/// One printable statement row.
#[derive(Debug, Clone, Copy)]
pub struct StatementLine {
    pub index: u32,
    pub label: &'static str,
    pub amount: Decimal,
}

impl FinancialStatement {
    pub fn compose(totals: CategoryTotals) -> Result<Self, ComposeError> {
        let costs = totals
            .administrative_expenses
            .checked_add(totals.personnel_costs)
            .ok_or(ComposeError::Overflow(LABEL_EXCESS_BEFORE_OTHER))?;
        let excess_before_other = totals
            .operating_income
            .checked_sub(costs)
            .ok_or(ComposeError::Overflow(LABEL_EXCESS_BEFORE_OTHER))?;
        let excess_before_tax = excess_before_other
            .checked_add(totals.other_non_operating)
            .ok_or(ComposeError::Overflow(LABEL_EXCESS_BEFORE_TAX))?;
        let net_excess = excess_before_tax
            .checked_sub(totals.tax)
            .ok_or(ComposeError::Overflow(LABEL_NET_EXCESS))?;

        Ok(Self {
            totals,
            excess_before_other,
            excess_before_tax,
            net_excess,
        })
    }

    /// The eight statement lines in presentation order.
    pub fn lines(&self) -> [StatementLine; 8] {
        [
            line(1, Category::OperatingIncome.label(), self.totals.operating_income),
            line(2, Category::PersonnelCosts.label(), self.totals.personnel_costs),
            line(
                3,
                Category::AdministrativeExpenses.label(),
                self.totals.administrative_expenses,
            ),
            line(4, LABEL_EXCESS_BEFORE_OTHER, self.excess_before_other),
            line(
                5,
                Category::OtherNonOperating.label(),
                self.totals.other_non_operating,
            ),
            line(6, LABEL_EXCESS_BEFORE_TAX, self.excess_before_tax),
            line(7, Category::Tax.label(), self.totals.tax),
            line(8, LABEL_NET_EXCESS, self.net_excess),
        ]
    }

    /// Lay the statement out as a renderer-agnostic table: title in A1
    /// merged across A1:B1, a spacer row, the column headers on row 3, and
    /// the eight statement lines on rows 4 through 11.
    pub fn to_table(&self) -> OutputTable {
        let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(11);
        rows.push(vec![CellValue::Text(STATEMENT_TITLE.to_string())]);
        rows.push(Vec::new());
        rows.push(
            COLUMN_HEADERS
                .iter()
                .map(|header| CellValue::Text(header.to_string()))
                .collect(),
        );
        for line in self.lines() {
            rows.push(vec![
                CellValue::Number(Decimal::from(line.index)),
                CellValue::Text(line.label.to_string()),
                CellValue::Number(line.amount),
            ]);
        }

        OutputTable {
            sheet_name: SHEET_NAME.to_string(),
            rows,
            merges: vec![Region::new(1, 1, 1, 2)],
            styles: vec![
                RegionStyle::new(Region::new(1, 1, 1, 2))
                    .bold()
                    .font_size(TITLE_FONT_SIZE)
                    .align(HorizontalAlign::Center),
                RegionStyle::new(Region::new(3, 1, 3, 3))
                    .bold()
                    .fill(HEADER_FILL_ARGB)
                    .font_color(HEADER_FONT_ARGB)
                    .align(HorizontalAlign::Center),
                RegionStyle::new(Region::new(4, 3, 11, 3)).align(HorizontalAlign::Right),
            ],
            column_widths: vec![("A", 10.0), ("B", 50.0), ("C", 20.0)],
            base_font: BaseFont {
                name: BASE_FONT_NAME,
                size: BASE_FONT_SIZE,
            },
        }
    }
}

fn line(index: u32, label: &'static str, amount: Decimal) -> StatementLine {
    StatementLine {
        index,
        label,
        amount,
    }
}

/// A rectangular cell region, rows and columns 1-based inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl Region {
    pub fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        Self {
            first_row,
            first_col,
            last_row,
            last_col,
        }
    }

    /// A1-style reference for the region, e.g. "A1:B1".
    pub fn to_ref(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letter(self.first_col),
            self.first_row,
            column_letter(self.last_col),
            self.last_row
        )
    }
}

fn column_letter(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Center,
    Right,
}

/// Formatting applied uniformly to one region of the output table.
#[derive(Debug, Clone, Copy)]
pub struct RegionStyle {
    pub region: Region,
    pub bold: bool,
    pub font_size: Option<f64>,
    pub fill_argb: Option<&'static str>,
    pub font_argb: Option<&'static str>,
    pub align: Option<HorizontalAlign>,
}

impl RegionStyle {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            bold: false,
            font_size: None,
            fill_argb: None,
            font_argb: None,
            align: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn fill(mut self, argb: &'static str) -> Self {
        self.fill_argb = Some(argb);
        self
    }

    pub fn font_color(mut self, argb: &'static str) -> Self {
        self.font_argb = Some(argb);
        self
    }

    pub fn align(mut self, align: HorizontalAlign) -> Self {
        self.align = Some(align);
        self
    }
}

/// Renderer-agnostic description of the statement output: cell grid plus
/// merges, region styles, column widths and the sheet-wide base font.
/// Writers consume this without knowing anything about statements.
#[derive(Debug, Clone)]
pub struct OutputTable {
    pub sheet_name: String,
    pub rows: Vec<Vec<CellValue>>,
    pub merges: Vec<Region>,
    pub styles: Vec<RegionStyle>,
    pub column_widths: Vec<(&'static str, f64)>,
    pub base_font: BaseFont,
}

#[derive(Debug, Clone, Copy)]
pub struct BaseFont {
    pub name: &'static str,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    Overflow(&'static str),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::Overflow(label) => write!(f, "derived total '{}' overflowed", label),
        }
    }
}

impl std::error::Error for ComposeError {}
