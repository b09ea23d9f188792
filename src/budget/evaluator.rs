use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::database::models::MonthKey;
use crate::util::fmt_money;

/// Share of the budget at or below which the remainder counts as low.
const LOW_BUDGET_RATIO: Decimal = dec!(0.10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BudgetStatus {
    #[serde(rename = "OK")]
    Ok,
    Low,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "OK",
            BudgetStatus::Low => "Low",
            BudgetStatus::Exceeded => "Exceeded",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: BudgetStatus,
    /// Present for `Low` and `Exceeded`.
    pub message: Option<String>,
}

impl Evaluation {
    fn ok() -> Self {
        Self {
            status: BudgetStatus::Ok,
            message: None,
        }
    }
}

/// Classifies `spent` against an optional monthly `budget`.
///
/// Overspending is checked first, so the low-budget branch only runs when
/// `spent <= budget` and the remainder is never negative.
pub fn evaluate(category: &str, month: MonthKey, spent: Decimal, budget: Option<Decimal>) -> Evaluation {
    let Some(budget) = budget else {
        return Evaluation::ok();
    };

    if spent > budget {
        return Evaluation {
            status: BudgetStatus::Exceeded,
            message: Some(format!(
                "Budget exceeded for {} in {}: spent {} > budget {}",
                category,
                month,
                fmt_money(&spent),
                fmt_money(&budget)
            )),
        };
    }

    let left = budget - spent;
    if left <= LOW_BUDGET_RATIO * budget {
        return Evaluation {
            status: BudgetStatus::Low,
            message: Some(format!(
                "Low budget for {} in {}: only {} left (<=10%)",
                category,
                month,
                fmt_money(&left)
            )),
        };
    }

    Evaluation::ok()
}
