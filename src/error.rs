use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Amount total for {0} is out of range")]
    AmountOverflow(String),
}

/// Rejected user input. The display text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be a number.")]
    AmountNotANumber,

    #[error("Amount must be positive.")]
    AmountNotPositive,

    #[error("Amount is too large.")]
    AmountTooLarge,

    #[error("Category is required.")]
    CategoryRequired,

    #[error("Category must be at most 64 characters.")]
    CategoryTooLong,

    #[error("Date must be YYYY-MM-DD or empty.")]
    InvalidDate,

    #[error("Month must be YYYY-MM.")]
    InvalidMonth,
}
