use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income-statement category a ledger row is classified into, keyed on the
/// prefix of its general-ledger account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Codes starting with "41" - operating revenue, contributes its credit side.
    OperatingIncome,
    /// Codes starting with "61" - administrative and general expenses, contributes its debit side.
    AdministrativeExpenses,
    /// Codes starting with "51" or "52" - personnel costs, contributes its debit side.
    PersonnelCosts,
    /// Codes starting with "7" - other non-operating items, contributes credit minus debit.
    OtherNonOperating,
    /// Codes starting with "34" - tax, contributes its debit side.
    Tax,
}

impl Category {
    /// All categories, in the order they appear on the statement.
    pub const ALL: [Category; 5] = [
        Category::OperatingIncome,
        Category::AdministrativeExpenses,
        Category::PersonnelCosts,
        Category::OtherNonOperating,
        Category::Tax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::OperatingIncome => "operating_income",
            Category::AdministrativeExpenses => "administrative_expenses",
            Category::PersonnelCosts => "personnel_costs",
            Category::OtherNonOperating => "other_non_operating",
            Category::Tax => "tax",
        }
    }

    /// Persian caption printed on the statement line for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::OperatingIncome => "درآمدهای عملیاتی",
            Category::AdministrativeExpenses => "هزینه‌های اداری و عمومی",
            Category::PersonnelCosts => "هزینه‌های پرسنلی",
            Category::OtherNonOperating => "سایر درآمدها و هزینه‌های غیر عملیاتی",
            Category::Tax => "مالیات",
        }
    }

    /// Whether an account code belongs to this category.
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Category::OperatingIncome => code.starts_with("41"),
            Category::AdministrativeExpenses => code.starts_with("61"),
            Category::PersonnelCosts => code.starts_with("51") || code.starts_with("52"),
            Category::OtherNonOperating => code.starts_with("7"),
            Category::Tax => code.starts_with("34"),
        }
    }

    /// Amount a row adds to this category's running total, given the row's
    /// debit and credit sides. `None` signals arithmetic overflow.
    pub fn contribution(&self, debit: Decimal, credit: Decimal) -> Option<Decimal> {
        match self {
            Category::OperatingIncome => Some(credit),
            Category::AdministrativeExpenses => Some(debit),
            Category::PersonnelCosts => Some(debit),
            Category::OtherNonOperating => credit.checked_sub(debit),
            Category::Tax => Some(debit),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
