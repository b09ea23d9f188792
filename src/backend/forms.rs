use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::database::models::NewExpense;
use crate::error::ValidationError;
use crate::util::{parse_iso_date, parse_money};

/// Raw `/add-expense` submission. Missing fields arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct AddExpenseForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SetBudgetForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
}

/// A validated budget upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetInput {
    pub category: String,
    pub monthly_budget: Decimal,
}

/// Largest accepted amount for a single expense or budget.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_CHARS: usize = 64;

fn positive_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let amount = parse_money(raw).ok_or(ValidationError::AmountNotANumber)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::AmountNotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount)
}

fn required_category(raw: &str) -> Result<String, ValidationError> {
    let category = raw.trim();
    if category.is_empty() {
        return Err(ValidationError::CategoryRequired);
    }
    if category.chars().count() > MAX_CATEGORY_CHARS {
        return Err(ValidationError::CategoryTooLong);
    }
    Ok(category.to_string())
}

impl AddExpenseForm {
    /// Checks run in a fixed order and stop at the first failure.
    /// A blank date falls back to `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<NewExpense, ValidationError> {
        let amount = positive_amount(&self.amount)?;
        let category = required_category(&self.category)?;

        let note = self.note.trim();
        let note = (!note.is_empty()).then(|| note.to_string());

        let date = match self.date.trim() {
            "" => today,
            raw => parse_iso_date(raw).ok_or(ValidationError::InvalidDate)?,
        };

        Ok(NewExpense {
            amount,
            category,
            date,
            note,
        })
    }
}

impl SetBudgetForm {
    pub fn validate(&self) -> Result<BudgetInput, ValidationError> {
        let monthly_budget = positive_amount(&self.amount)?;
        let category = required_category(&self.category)?;
        Ok(BudgetInput {
            category,
            monthly_budget,
        })
    }
}
