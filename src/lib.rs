pub mod backend;
pub mod budget;
pub mod config;
pub mod database;
pub mod error;
pub mod util;
