use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::evaluator::{evaluate, BudgetStatus};
use crate::database::models::{Budget, Expense, MonthKey};
use crate::error::{Error, Result};

/// Spend against budget for one category in the reported month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub spent: Decimal,
    pub budget: Option<Decimal>,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    pub month: MonthKey,
    pub total_spent: Decimal,
    /// Sorted by category name.
    pub categories: Vec<CategoryRow>,
    /// The month's expenses, oldest first.
    pub expenses: Vec<Expense>,
}

/// Joins a month's expenses with the budget table.
///
/// Every category that has spend in `month` or a budget gets exactly one row.
/// Expenses dated outside `month` are ignored. Fails with
/// [`Error::AmountOverflow`] when a total leaves the decimal range.
pub fn build_report(month: MonthKey, expenses: &[Expense], budgets: &[Budget]) -> Result<MonthlyReport> {
    let mut in_month: Vec<Expense> = expenses
        .iter()
        .filter(|e| month.contains(e.date))
        .cloned()
        .collect();
    in_month.sort_by(|a, b| a.date.cmp(&b.date).then(a.expense_id.cmp(&b.expense_id)));

    let mut totals: BTreeMap<&str, (Decimal, Option<Decimal>)> = BTreeMap::new();
    let mut total_spent = Decimal::ZERO;
    for expense in &in_month {
        let spent = &mut totals.entry(expense.category.as_str()).or_default().0;
        *spent = spent
            .checked_add(expense.amount)
            .ok_or_else(|| Error::AmountOverflow(format!("{} in {}", expense.category, month)))?;
        total_spent = total_spent
            .checked_add(expense.amount)
            .ok_or_else(|| Error::AmountOverflow(month.to_string()))?;
    }
    for budget in budgets {
        totals.entry(budget.category.as_str()).or_default().1 = Some(budget.monthly_budget);
    }

    let categories = totals
        .into_iter()
        .map(|(category, (spent, budget))| CategoryRow {
            category: category.to_string(),
            spent,
            budget,
            status: evaluate(category, month, spent, budget).status,
        })
        .collect();

    Ok(MonthlyReport {
        month,
        total_spent,
        categories,
        expenses: in_month,
    })
}
