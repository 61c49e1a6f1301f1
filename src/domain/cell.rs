use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// A single worksheet cell, reduced to the three shapes the ledger pipeline
/// distinguishes. Whatever else a spreadsheet engine can store (dates,
/// booleans, formula errors) is rendered to text before it reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(Decimal),
}

impl CellValue {
    /// Text rendering of the cell, as a reader of the grid would see it.
    /// Integral numbers render without a fractional part, so an account code
    /// stored as the number 4105 compares like the text "4105".
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(d) => d.normalize().to_string(),
        }
    }

    /// Interpret the cell as a signed amount.
    /// Blank and whitespace-only cells count as zero; any other text that
    /// does not parse as a plain decimal is an error. Thousands separators
    /// and scientific notation are rejected.
    pub fn to_amount(&self) -> Result<Decimal, ParseAmountError> {
        match self {
            CellValue::Blank => Ok(Decimal::ZERO),
            CellValue::Number(d) => Ok(*d),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(Decimal::ZERO);
                }
                Decimal::from_str(trimmed).map_err(|_| ParseAmountError::NotANumber(s.clone()))
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    NotANumber(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::NotANumber(s) => write!(f, "not a decimal amount: '{}'", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}
