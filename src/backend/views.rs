//! Server-rendered pages. User-supplied text always goes through `escape`.

use chrono::NaiveDate;

use crate::budget::{MonthlyReport, Notice};
use crate::database::models::Budget;
use crate::util::{fmt_money, iso};

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto;padding:0 1rem}\
nav a{margin-right:1rem}table{border-collapse:collapse;width:100%;margin:1rem 0}\
th,td{border:1px solid #ccc;padding:.3rem .5rem;text-align:left}\
.notice{padding:.6rem;margin:1rem 0;border-radius:4px}.success{background:#e3f5e1}\
.error{background:#fbe3e3}.warning{background:#fff4d6}.alert{background:#f9d0d0;font-weight:bold}\
.status-Low{color:#a66b00}.status-Exceeded{color:#b00020;font-weight:bold}\
form.inline{display:inline}label{display:block;margin:.4rem 0}";

fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

fn layout(title: &str, notice: Option<&Notice>, body: &str) -> String {
    let notice_html = notice
        .map(|n| {
            format!(
                r#"<div class="notice {}">{}</div>"#,
                n.level,
                escape(&n.text)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Expense Tracker</title><style>{STYLE}</style></head>
<body>
<nav><a href="/">Home</a><a href="/add-expense">Add expense</a><a href="/set-budget">Budgets</a><a href="/report">Monthly report</a></nav>
<h1>{title}</h1>
{notice_html}
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

pub fn index_page(notice: Option<&Notice>) -> String {
    let body = r#"<p>Record what you spend, set a monthly budget per category, and check each month's report.</p>
<ul>
<li><a href="/add-expense">Add an expense</a></li>
<li><a href="/set-budget">Set category budgets</a></li>
<li><a href="/report">View this month's report</a></li>
</ul>"#;
    layout("Expense Tracker", notice, body)
}

pub fn add_expense_page(notice: Option<&Notice>, today: NaiveDate) -> String {
    let body = format!(
        r#"<form method="post" action="/add-expense">
<label>Amount <input name="amount" inputmode="decimal" required></label>
<label>Category <input name="category" required></label>
<label>Date <input name="date" type="date" placeholder="{today}"> (blank for today)</label>
<label>Note <input name="note"></label>
<button type="submit">Add expense</button>
</form>"#,
        today = iso(&today)
    );
    layout("Add expense", notice, &body)
}

pub fn set_budget_page(notice: Option<&Notice>, budgets: &[Budget]) -> String {
    let mut body = String::from(
        r#"<form method="post" action="/set-budget">
<label>Category <input name="category" required></label>
<label>Monthly budget <input name="amount" inputmode="decimal" required></label>
<button type="submit">Save budget</button>
</form>
"#,
    );

    if budgets.is_empty() {
        body.push_str("<p>No budgets yet.</p>");
    } else {
        body.push_str("<table><thead><tr><th>Category</th><th>Monthly budget</th><th></th></tr></thead><tbody>");
        for budget in budgets {
            body.push_str(&format!(
                r#"<tr><td>{}</td><td>{}</td><td><form class="inline" method="post" action="/delete-budget/{}"><button type="submit">Delete</button></form></td></tr>"#,
                escape(&budget.category),
                fmt_money(&budget.monthly_budget),
                budget.budget_id
            ));
        }
        body.push_str("</tbody></table>");
    }

    layout("Budgets", notice, &body)
}

pub fn report_page(notice: Option<&Notice>, report: &MonthlyReport) -> String {
    let month = report.month.to_string();
    let mut body = format!(
        r#"<form method="get" action="/report">
<label>Month <input name="month" type="month" value="{month}"></label>
<button type="submit">Show</button>
</form>
<p>Total spent in {month}: <strong>{total}</strong></p>
"#,
        total = fmt_money(&report.total_spent)
    );

    body.push_str("<h2>By category</h2>");
    if report.categories.is_empty() {
        body.push_str("<p>No spending or budgets for this month.</p>");
    } else {
        body.push_str("<table><thead><tr><th>Category</th><th>Spent</th><th>Budget</th><th>Status</th></tr></thead><tbody>");
        for row in &report.categories {
            let budget = row.budget.as_ref().map(fmt_money).unwrap_or_else(|| "-".to_string());
            body.push_str(&format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="status-{}">{}</td></tr>"#,
                escape(&row.category),
                fmt_money(&row.spent),
                budget,
                row.status,
                row.status
            ));
        }
        body.push_str("</tbody></table>");
    }

    body.push_str("<h2>Expenses</h2>");
    if report.expenses.is_empty() {
        body.push_str("<p>No expenses recorded this month.</p>");
    } else {
        body.push_str("<table><thead><tr><th>Date</th><th>Category</th><th>Amount</th><th>Note</th><th></th></tr></thead><tbody>");
        for expense in &report.expenses {
            body.push_str(&format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><form class="inline" method="post" action="/delete-expense/{}"><button type="submit">Delete</button></form></td></tr>"#,
                iso(&expense.date),
                escape(&expense.category),
                fmt_money(&expense.amount),
                escape(expense.note.as_deref().unwrap_or("")),
                expense.expense_id
            ));
        }
        body.push_str("</tbody></table>");
    }

    layout(&format!("Report for {month}"), notice, &body)
}
