use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    response::Response,
    Router,
};
use expense_tracker::{
    backend::{app_router, build_state, flash::pending_notice},
    budget::{Notice, NoticeLevel},
    config::Config,
    database::{
        db::queries,
        models::{Expense, MonthKey, NewExpense},
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::{Pool, Sqlite};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    router: Router,
    db: Pool<Sqlite>,
}

async fn build_test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let state = build_state(&Config::for_database(url)).await.unwrap();
    let db = state.db.clone();
    TestApp {
        _dir: dir,
        router: app_router(state),
        db,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }
}

// Reads back the notice a redirect left in its Set-Cookie header.
fn notice_of(response: &Response) -> Notice {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let pair = set_cookie.split(';').next().unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
    pending_notice(&headers).expect("redirect should carry a notice")
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn expenses_in(db: &Pool<Sqlite>, month: &str) -> Vec<Expense> {
    queries::get_expenses_by_month(db, month.parse().unwrap()).await.unwrap()
}

fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn health_responds() {
    let app = build_test_app().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn pages_render() {
    let app = build_test_app().await;
    for uri in ["/", "/add-expense", "/set-budget", "/report", "/report?month=2024-03"] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains("<nav>"), "{uri}");
    }
}

#[tokio::test]
async fn expense_without_budget_is_added() {
    let app = build_test_app().await;
    let response = app
        .post_form("/add-expense", "amount=12.50&category=Food&date=2024-03-05&note=lunch")
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/add-expense");
    assert_eq!(notice_of(&response), Notice::success("Expense added."));

    let stored = expenses_in(&app.db, "2024-03").await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].amount, dec!(12.50));
    assert_eq!(stored[0].note.as_deref(), Some("lunch"));
}

#[tokio::test]
async fn expense_over_budget_raises_alert() {
    let app = build_test_app().await;
    app.post_form("/set-budget", "category=Food&amount=100").await;

    let response = app
        .post_form("/add-expense", "amount=101&category=Food&date=2024-03-10")
        .await;
    let notice = notice_of(&response);
    assert_eq!(notice.level, NoticeLevel::Alert);
    assert!(notice.text.contains("spent 101.00"), "{}", notice.text);
    assert!(notice.text.contains("budget 100.00"), "{}", notice.text);
}

#[tokio::test]
async fn expense_near_budget_raises_warning() {
    let app = build_test_app().await;
    app.post_form("/set-budget", "category=Food&amount=100").await;

    let response = app
        .post_form("/add-expense", "amount=95&category=Food&date=2024-03-10")
        .await;
    assert_eq!(
        notice_of(&response),
        Notice::new(
            NoticeLevel::Warning,
            "Low budget for Food in 2024-03: only 5.00 left (<=10%)"
        )
    );
}

#[tokio::test]
async fn invalid_expenses_are_not_persisted() {
    let app = build_test_app().await;
    let cases = [
        ("amount=abc&category=Food", "Amount must be a number."),
        ("amount=0&category=Food", "Amount must be positive."),
        ("amount=-5&category=Food", "Amount must be positive."),
        ("amount=5&category=%20%20", "Category is required."),
        ("amount=5&category=Food&date=05%2F03%2F2024", "Date must be YYYY-MM-DD or empty."),
        ("amount=1000000000000.01&category=Food", "Amount is too large."),
        ("amount=79228162514264337593543950335&category=Food", "Amount is too large."),
    ];

    for (body, message) in cases {
        let response = app.post_form("/add-expense", body).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{body}");
        assert_eq!(location(&response), "/add-expense");
        assert_eq!(notice_of(&response), Notice::error(message), "{body}");
    }

    let this_month = MonthKey::current().to_string();
    assert!(expenses_in(&app.db, &this_month).await.is_empty());
}

#[tokio::test]
async fn blank_date_is_stored_as_today() {
    let app = build_test_app().await;
    app.post_form("/add-expense", "amount=5&category=Food&date=").await;

    let stored = expenses_in(&app.db, &MonthKey::current().to_string()).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].date, chrono::Local::now().date_naive());
}

#[tokio::test]
async fn deleting_an_expense_twice_is_idempotent() {
    let app = build_test_app().await;
    app.post_form("/add-expense", "amount=5&category=Food&date=2024-03-01").await;
    app.post_form("/add-expense", "amount=7&category=Food&date=2024-03-02").await;
    let id = expenses_in(&app.db, "2024-03").await[0].expense_id;

    for _ in 0..2 {
        let response = app
            .send(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/delete-expense/{id}"))
                    .header(header::REFERER, "http://localhost:3000/report?month=2024-03")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/report?month=2024-03");
        assert_eq!(notice_of(&response), Notice::success("Expense deleted successfully."));
    }

    let remaining = expenses_in(&app.db, "2024-03").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].amount, dec!(7));
}

#[tokio::test]
async fn setting_a_budget_twice_overwrites_it() {
    let app = build_test_app().await;
    app.post_form("/set-budget", "category=Food&amount=100").await;
    let response = app.post_form("/set-budget", "category=Food&amount=150.5").await;

    assert_eq!(location(&response), "/set-budget");
    assert_eq!(notice_of(&response), Notice::success("Budget set for Food: 150.50"));

    let budgets = queries::get_all_budgets(&app.db).await.unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].monthly_budget, dec!(150.5));
}

#[tokio::test]
async fn invalid_budget_is_rejected() {
    let app = build_test_app().await;
    let response = app.post_form("/set-budget", "category=Food&amount=-1").await;

    assert_eq!(notice_of(&response), Notice::error("Amount must be positive."));
    assert!(queries::get_all_budgets(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_budget_twice_is_idempotent() {
    let app = build_test_app().await;
    app.post_form("/set-budget", "category=Food&amount=100").await;
    let id = queries::get_all_budgets(&app.db).await.unwrap()[0].budget_id;

    for _ in 0..2 {
        let response = app.post_form(&format!("/delete-budget/{id}"), "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/set-budget");
        assert_eq!(notice_of(&response), Notice::success("Budget deleted successfully."));
    }

    assert!(queries::get_all_budgets(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn report_aggregates_the_requested_month() {
    let app = build_test_app().await;
    app.post_form("/set-budget", "category=Food&amount=100").await;
    app.post_form("/set-budget", "category=Books&amount=200").await;
    app.post_form("/add-expense", "amount=60&category=Food&date=2024-03-20").await;
    app.post_form("/add-expense", "amount=35&category=Food&date=2024-03-02").await;
    app.post_form("/add-expense", "amount=12.25&category=Travel&date=2024-03-15").await;
    app.post_form("/add-expense", "amount=500&category=Food&date=2024-04-01").await;

    let response = app.get("/api/report?month=2024-03").await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

    assert_eq!(report["month"], "2024-03");
    assert_eq!(decimal(&report["total_spent"]), dec!(107.25));

    let categories = report["categories"].as_array().unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c["category"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Books", "Food", "Travel"]);

    assert_eq!(decimal(&categories[0]["spent"]), Decimal::ZERO);
    assert_eq!(categories[0]["status"], "OK");
    assert_eq!(decimal(&categories[1]["spent"]), dec!(95));
    assert_eq!(categories[1]["status"], "Low");
    assert!(categories[2]["budget"].is_null());
    assert_eq!(categories[2]["status"], "OK");

    let dates: Vec<&str> = report["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-03-02", "2024-03-15", "2024-03-20"]);
}

#[tokio::test]
async fn overlong_category_is_rejected() {
    let app = build_test_app().await;
    let category = "x".repeat(65);

    let response = app
        .post_form("/add-expense", &format!("amount=5&category={category}&date=2024-03-01"))
        .await;
    assert_eq!(notice_of(&response), Notice::error("Category must be at most 64 characters."));
    assert!(expenses_in(&app.db, "2024-03").await.is_empty());

    let response = app.post_form("/set-budget", &format!("category={category}&amount=10")).await;
    assert_eq!(notice_of(&response), Notice::error("Category must be at most 64 characters."));
    assert!(queries::get_all_budgets(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_totals_are_a_server_error() {
    let app = build_test_app().await;
    for category in ["A", "B"] {
        let new = NewExpense {
            amount: Decimal::MAX,
            category: category.to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            note: None,
        };
        queries::insert_expense(&app.db, &new).await.unwrap();
    }

    assert_eq!(
        app.get("/api/report?month=2024-03").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        app.get("/report?month=2024-03").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    let response = app
        .post_form("/add-expense", "amount=5&category=A&date=2024-03-02")
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(expenses_in(&app.db, "2024-03").await.len(), 2);

    let response = app.get("/api/report?month=2024-04").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_month_is_a_bad_request() {
    let app = build_test_app().await;
    assert_eq!(app.get("/report?month=March").await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/report?month=2024-13").await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notice_is_shown_once_and_cleared() {
    let app = build_test_app().await;
    let redirect = app.post_form("/add-expense", "amount=0&category=Food").await;
    let cookie = redirect.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let page = app
        .send(
            Request::builder()
                .uri("/add-expense")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    let cleared = page.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cleared.starts_with("expense_notice=;"));
    assert!(cleared.contains("Max-Age=0"));
    assert!(body_text(page).await.contains(r#"class="notice error""#));

    let plain = app.get("/add-expense").await;
    assert!(plain.headers().get(header::SET_COOKIE).is_none());
    assert!(!body_text(plain).await.contains(r#"class="notice"#));
}
