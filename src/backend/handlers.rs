use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Uri},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;

use crate::backend::error::ApiResult;
use crate::backend::flash::{clear_notice_cookie, pending_notice, redirect_with_notice};
use crate::backend::forms::{AddExpenseForm, SetBudgetForm};
use crate::backend::{views, AppState};
use crate::budget::{build_report, record_expense, MonthlyReport, Notice};
use crate::database::db::queries;
use crate::database::models::MonthKey;
use crate::error::ValidationError;
use crate::util::{fmt_money, today};

#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub month: Option<String>,
}

// Renders a page, consuming any notice left by the previous redirect.
fn render_page(headers: &HeaderMap, render: impl FnOnce(Option<&Notice>) -> String) -> Response {
    let notice = pending_notice(headers);
    let html = Html(render(notice.as_ref()));
    match notice {
        Some(_) => ([(header::SET_COOKIE, clear_notice_cookie())], html).into_response(),
        None => html.into_response(),
    }
}

// Path of the page that submitted the form, falling back to the report.
fn referring_path(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| referer.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/report".to_string())
}

fn resolve_month(params: &ReportParams) -> Result<MonthKey, ValidationError> {
    match params.month.as_deref().map(str::trim) {
        None | Some("") => Ok(MonthKey::current()),
        Some(raw) => raw.parse(),
    }
}

async fn load_report(state: &AppState, month: MonthKey) -> ApiResult<MonthlyReport> {
    let expenses = queries::get_expenses_by_month(&state.db, month).await?;
    let budgets = queries::get_all_budgets(&state.db).await?;
    Ok(build_report(month, &expenses, &budgets)?)
}

pub async fn index(headers: HeaderMap) -> Response {
    render_page(&headers, views::index_page)
}

pub async fn add_expense_page(headers: HeaderMap) -> Response {
    render_page(&headers, |notice| views::add_expense_page(notice, today()))
}

pub async fn add_expense(
    State(state): State<AppState>,
    Form(form): Form<AddExpenseForm>,
) -> ApiResult<Response> {
    let new = match form.validate(today()) {
        Ok(new) => new,
        Err(e) => {
            tracing::debug!(error = %e, "rejected expense submission");
            return Ok(redirect_with_notice("/add-expense", &Notice::error(e.to_string())));
        }
    };

    let (expense, notice) = record_expense(&state.db, &new).await?;
    tracing::info!(
        expense_id = expense.expense_id,
        category = %expense.category,
        amount = %expense.amount,
        date = %expense.date,
        "expense recorded"
    );

    Ok(redirect_with_notice("/add-expense", &notice))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let removed = queries::delete_expense(&state.db, expense_id).await?;
    tracing::info!(expense_id, removed, "expense deleted");

    Ok(redirect_with_notice(
        &referring_path(&headers),
        &Notice::success("Expense deleted successfully."),
    ))
}

pub async fn set_budget_page(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let budgets = queries::get_all_budgets(&state.db).await?;
    Ok(render_page(&headers, |notice| views::set_budget_page(notice, &budgets)))
}

pub async fn set_budget(
    State(state): State<AppState>,
    Form(form): Form<SetBudgetForm>,
) -> ApiResult<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "rejected budget submission");
            return Ok(redirect_with_notice("/set-budget", &Notice::error(e.to_string())));
        }
    };

    let budget = queries::upsert_budget(&state.db, &input.category, input.monthly_budget).await?;
    tracing::info!(
        budget_id = budget.budget_id,
        category = %budget.category,
        monthly_budget = %budget.monthly_budget,
        "budget set"
    );

    let notice = Notice::success(format!(
        "Budget set for {}: {}",
        budget.category,
        fmt_money(&budget.monthly_budget)
    ));
    Ok(redirect_with_notice("/set-budget", &notice))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<i64>,
) -> ApiResult<Response> {
    let removed = queries::delete_budget(&state.db, budget_id).await?;
    tracing::info!(budget_id, removed, "budget deleted");

    Ok(redirect_with_notice("/set-budget", &Notice::success("Budget deleted successfully.")))
}

pub async fn report_page(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let month = resolve_month(&params)?;
    let report = load_report(&state, month).await?;
    Ok(render_page(&headers, |notice| views::report_page(notice, &report)))
}

pub async fn report_json(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Json<MonthlyReport>> {
    let month = resolve_month(&params)?;
    Ok(Json(load_report(&state, month).await?))
}
