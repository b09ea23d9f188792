//! Budget rules: per-category status evaluation, the monthly report, and the
//! notice produced when an expense is recorded.

pub mod evaluator;
pub mod notifier;
pub mod report;

pub use evaluator::{evaluate, BudgetStatus, Evaluation};
pub use notifier::{record_expense, Notice, NoticeLevel};
pub use report::{build_report, CategoryRow, MonthlyReport};
