use crate::error::WalletError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported wallet currencies.
///
/// Resolved once at the request boundary; unrecognized currency codes are
/// rejected with a validation error instead of silently aliasing to a
/// default balance field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ghs,
    Ngn,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ghs => "GHS",
            Currency::Ngn => "NGN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GHS" => Ok(Currency::Ghs),
            "NGN" => Ok(Currency::Ngn),
            other => Err(WalletError::Validation(format!(
                "unsupported currency '{other}'"
            ))),
        }
    }
}

/// A positive monetary amount in major currency units.
///
/// Construction fails for zero or negative values, so every operation that
/// carries an `Amount` has already passed the amount > 0 check.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, WalletError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(WalletError::Validation(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts to the gateway's minor currency unit (x100).
    ///
    /// This is the only place the major/minor boundary is crossed; internal
    /// balances are always kept in major units. Amounts finer than the minor
    /// unit are rejected rather than rounded, so the charged value is always
    /// exactly the requested value.
    pub fn to_minor_units(&self) -> Result<i64, WalletError> {
        let minor = self.0 * Decimal::from(100);
        if !minor.fract().is_zero() {
            return Err(WalletError::Validation(format!(
                "amount {} is finer than the minor currency unit",
                self.0
            )));
        }
        minor.to_i64().ok_or_else(|| {
            WalletError::Validation("amount out of range for gateway transfer".to_string())
        })
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = WalletError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
