use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MonthKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: i64,
    pub amount: Decimal,      // always > 0
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl Expense {
    pub fn month(&self) -> MonthKey {
        MonthKey::from(self.date)
    }
}

/// A validated expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub note: Option<String>,
}
