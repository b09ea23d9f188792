use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Pool, Row, Sqlite};

use crate::database::models::{Budget, Expense, MonthKey, NewExpense};
use crate::error::Error;
use crate::util::iso;
/*
SQL for the two ledger tables. Amounts are stored as decimal TEXT and dates
as ISO yyyy-mm-dd TEXT, so a month is the 7-character prefix of a date.

Functions that the expense notifier runs inside one transaction take any
executor; the rest take the pool.
 */

fn decode_decimal(text: &str, column: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(text)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format for {}: {}", column, e).into()))
}

fn map_expense(row: &SqliteRow) -> Result<Expense, sqlx::Error> {
    let amount_text: String = row.try_get("amount")?;
    let date_text: String = row.try_get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
        .map_err(|e| sqlx::Error::Decode(format!("Invalid date format for date: {}", e).into()))?;

    Ok(Expense {
        expense_id: row.try_get("expense_id")?,
        amount: decode_decimal(&amount_text, "amount")?,
        category: row.try_get("category")?,
        date,
        note: row.try_get("note")?,
    })
}

fn map_budget(row: &SqliteRow) -> Result<Budget, sqlx::Error> {
    let budget_text: String = row.try_get("monthly_budget")?;

    Ok(Budget {
        budget_id: row.try_get("budget_id")?,
        category: row.try_get("category")?,
        monthly_budget: decode_decimal(&budget_text, "monthly_budget")?,
    })
}

/*==========Expense Queries=========== */

pub async fn insert_expense<'e, E>(executor: E, new: &NewExpense) -> Result<Expense, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        INSERT INTO expenses (amount, category, date, note)
        VALUES (?, ?, ?, ?)
        RETURNING expense_id, amount, category, date, note
        "#,
    )
    .bind(new.amount.to_string())
    .bind(&new.category)
    .bind(iso(&new.date))
    .bind(new.note.as_deref())
    .fetch_one(executor)
    .await?;

    map_expense(&row)
}

// Returns whether a row was removed. Missing ids are not an error.
pub async fn delete_expense(pool: &Pool<Sqlite>, expense_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM expenses WHERE expense_id = ?")
        .bind(expense_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_expenses_by_month(pool: &Pool<Sqlite>, month: MonthKey) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT expense_id, amount, category, date, note
        FROM expenses
        WHERE substr(date, 1, 7) = ?
        ORDER BY date ASC, expense_id ASC
        "#,
    )
    .bind(month.to_string())
    .fetch_all(pool)
    .await?
    .iter()
    .map(map_expense)
    .collect()
}

// Total spent in one category for one month, summed as decimals.
// A total outside the decimal range is an error rather than a panic.
pub async fn category_spent_in_month<'e, E>(
    executor: E,
    category: &str,
    month: MonthKey,
) -> crate::error::Result<Decimal>
where
    E: Executor<'e, Database = Sqlite>,
{
    let amounts: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount
        FROM expenses
        WHERE category = ? AND substr(date, 1, 7) = ?
        "#,
    )
    .bind(category)
    .bind(month.to_string())
    .fetch_all(executor)
    .await?;

    let mut spent = Decimal::ZERO;
    for text in &amounts {
        spent = spent
            .checked_add(decode_decimal(text, "amount")?)
            .ok_or_else(|| Error::AmountOverflow(format!("{} in {}", category, month)))?;
    }
    Ok(spent)
}

/*==========Budget Queries=========== */

// Insert, or overwrite the amount of the existing budget for this category.
pub async fn upsert_budget(
    pool: &Pool<Sqlite>,
    category: &str,
    monthly_budget: Decimal,
) -> Result<Budget, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO budgets (category, monthly_budget)
        VALUES (?, ?)
        ON CONFLICT (category) DO UPDATE SET monthly_budget = excluded.monthly_budget
        RETURNING budget_id, category, monthly_budget
        "#,
    )
    .bind(category)
    .bind(monthly_budget.to_string())
    .fetch_one(pool)
    .await?;

    map_budget(&row)
}

pub async fn get_all_budgets(pool: &Pool<Sqlite>) -> Result<Vec<Budget>, sqlx::Error> {
    sqlx::query("SELECT budget_id, category, monthly_budget FROM budgets ORDER BY category ASC")
        .fetch_all(pool)
        .await?
        .iter()
        .map(map_budget)
        .collect()
}

pub async fn get_budget_by_category<'e, E>(executor: E, category: &str) -> Result<Option<Budget>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("SELECT budget_id, category, monthly_budget FROM budgets WHERE category = ?")
        .bind(category)
        .fetch_optional(executor)
        .await?
        .as_ref()
        .map(map_budget)
        .transpose()
}

pub async fn delete_budget(pool: &Pool<Sqlite>, budget_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM budgets WHERE budget_id = ?")
        .bind(budget_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
