use axum::{
    routing::{get, post},
    Router,
};
use crate::backend::{handlers, AppState};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add-expense", get(handlers::add_expense_page).post(handlers::add_expense))
        .route("/delete-expense/{id}", post(handlers::delete_expense))
        .route("/set-budget", get(handlers::set_budget_page).post(handlers::set_budget))
        .route("/delete-budget/{id}", post(handlers::delete_budget))
        .route("/report", get(handlers::report_page))
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/report", get(handlers::report_json))
}
