mod error;
pub mod flash;
pub mod forms;
mod handlers;
mod routes;
pub mod views;

use axum::{
    routing::get,
    Router,
};
use sqlx::{Pool, Sqlite};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::database::db::{connection::get_db_pool, migrate::run_migrations};

pub use error::{ApiError, ApiResult};

/// Shared by every handler; the pool is the only cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
}

pub async fn build_state(config: &Config) -> crate::error::Result<AppState> {
    let pool = get_db_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    tracing::info!(database_url = %config.database_url, "database ready");
    Ok(AppState { db: pool })
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Expense tracker is running" }))
        .merge(routes::page_routes())
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json().with_current_span(false)).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
