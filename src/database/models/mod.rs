pub mod budget;
pub mod expense;
pub mod month;

pub use budget::Budget;
pub use expense::{Expense, NewExpense};
pub use month::MonthKey;
