use std::fmt;
use std::str::FromStr;

use sqlx::{Pool, Sqlite};

use super::evaluator::{evaluate, BudgetStatus};
use crate::database::db::queries;
use crate::database::models::{Expense, NewExpense};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Alert,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Alert => "alert",
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeLevel {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(NoticeLevel::Success),
            "error" => Ok(NoticeLevel::Error),
            "warning" => Ok(NoticeLevel::Warning),
            "alert" => Ok(NoticeLevel::Alert),
            _ => Err(()),
        }
    }
}

/// One-shot message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

/// Stores the expense, then re-evaluates its category for the expense's month.
///
/// Insert, month total and budget lookup share one transaction so the notice
/// reflects exactly the state the new row was committed into.
pub async fn record_expense(pool: &Pool<Sqlite>, new: &NewExpense) -> Result<(Expense, Notice)> {
    let mut tx = pool.begin().await?;

    let expense = queries::insert_expense(&mut *tx, new).await?;
    let month = expense.month();
    let spent = queries::category_spent_in_month(&mut *tx, &expense.category, month).await?;
    let budget = queries::get_budget_by_category(&mut *tx, &expense.category).await?;

    tx.commit().await?;

    let evaluation = evaluate(
        &expense.category,
        month,
        spent,
        budget.map(|b| b.monthly_budget),
    );

    let notice = match (evaluation.status, evaluation.message) {
        (BudgetStatus::Exceeded, Some(message)) => {
            tracing::warn!(category = %expense.category, %month, %spent, "budget exceeded");
            Notice::new(NoticeLevel::Alert, message)
        }
        (BudgetStatus::Low, Some(message)) => {
            tracing::warn!(category = %expense.category, %month, %spent, "budget running low");
            Notice::new(NoticeLevel::Warning, message)
        }
        _ => Notice::success("Expense added."),
    };

    Ok((expense, notice))
}
