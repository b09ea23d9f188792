use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly spending ceiling for one category. At most one per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub budget_id: i64,
    pub category: String,
    pub monthly_budget: Decimal,
}
