use crate::domain::money::Currency;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

/// Error taxonomy for the wallet engine.
///
/// Validation and funds errors are raised before any mutation. Gateway errors
/// abort an operation before any internal write. Persistence failures that
/// occur *after* a successful money-moving gateway call are not surfaced
/// through this type at the operation boundary; they are reported as a
/// reconciliation outcome instead (see `application::executor`).
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("insufficient funds in {currency} balance")]
    InsufficientFunds { currency: Currency },

    #[error("{0} not found")]
    NotFound(String),

    #[error("gateway error ({code}): {message}")]
    Gateway { code: String, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// True when the caller may safely retry the operation with the same
    /// inputs: nothing was mutated and no money moved.
    pub fn is_pre_mutation(&self) -> bool {
        matches!(
            self,
            WalletError::Validation(_)
                | WalletError::InsufficientFunds { .. }
                | WalletError::NotFound(_)
        )
    }
}
