use crate::domain::money::{Amount, Currency};
use crate::error::WalletError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A virtual card embedded in an account document.
///
/// Created by the issue-card operation; funding and freeze/unfreeze mutate it
/// in place. At most one card exists per account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct VirtualCard {
    /// Gateway-assigned card identifier, used for all follow-up calls.
    pub gateway_ref: String,
    pub masked_pan: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub currency: Currency,
    /// Internal spend balance, funded from the owning account.
    pub balance: Decimal,
    pub active: bool,
}

/// A user's wallet document: one balance field per supported currency.
///
/// Balance invariant: both fields are >= 0 at rest. All mutation goes through
/// `debit`/`credit`, which are pure computation; callers persist the result.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub balance_ghs: Decimal,
    pub balance_ngn: Decimal,
    #[serde(default)]
    pub card: Option<VirtualCard>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            balance_ghs: Decimal::ZERO,
            balance_ngn: Decimal::ZERO,
            card: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn balance(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Ghs => self.balance_ghs,
            Currency::Ngn => self.balance_ngn,
        }
    }

    fn balance_mut(&mut self, currency: Currency) -> &mut Decimal {
        match currency {
            Currency::Ghs => &mut self.balance_ghs,
            Currency::Ngn => &mut self.balance_ngn,
        }
    }

    /// Debits the currency-scoped balance if funds suffice.
    ///
    /// Fails with `InsufficientFunds` and performs no mutation otherwise;
    /// the returned balance is never negative.
    pub fn debit(&mut self, currency: Currency, amount: Amount) -> Result<Decimal, WalletError> {
        let field = self.balance_mut(currency);
        if *field < amount.value() {
            return Err(WalletError::InsufficientFunds { currency });
        }
        *field -= amount.value();
        let new_balance = *field;
        self.touch();
        Ok(new_balance)
    }

    /// Credits the currency-scoped balance. Balances are unbounded above.
    pub fn credit(&mut self, currency: Currency, amount: Amount) -> Decimal {
        let field = self.balance_mut(currency);
        *field += amount.value();
        let new_balance = *field;
        self.touch();
        new_balance
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
