use std::net::SocketAddr;

use clap::Parser;

/// Every option can also come from the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "expense-tracker", about = "Personal expense tracker with monthly budgets")]
pub struct Config {
    /// SQLite database URL; the file is created on first start
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://expenses.db")]
    pub database_url: String,

    /// Address the HTTP server listens on
    #[arg(long = "listen", env = "EXPENSES_LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen_addr: SocketAddr,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "EXPENSES_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "EXPENSES_LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

impl Config {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Config::parse()
    }

    pub fn for_database(database_url: impl Into<String>) -> Self {
        Config {
            database_url: database_url.into(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}
