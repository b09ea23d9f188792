// src/main.rs
use expense_tracker::{backend, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    backend::init_tracing(&config);

    tracing::info!("Starting expense tracker...");
    backend::run_server(&config).await?;

    Ok(())
}
