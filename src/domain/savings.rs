use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A savings (susu/ajo) plan document.
///
/// Owned by an external collaborator; this engine only increments the running
/// balance via the fund-savings operation, so the balance is monotonically
/// non-decreasing here.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SavingsPlan {
    pub id: String,
    pub name: String,
    pub balance: Decimal,
}
