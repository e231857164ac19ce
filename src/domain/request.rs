use crate::domain::money::{Amount, Currency};
use serde::{Deserialize, Serialize};

/// An inbound operation request, tagged by `type`.
///
/// The caller's verified account id travels alongside the request (it is not
/// part of the payload); see `interfaces::json::OperationEnvelope`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum OperationRequest {
    Transfer {
        amount: Amount,
        currency: Currency,
        details: TransferDetails,
    },
    PayBill {
        amount: Amount,
        currency: Currency,
        details: BillDetails,
    },
    FundSavings {
        amount: Amount,
        currency: Currency,
        details: SavingsDetails,
    },
    TopUp {
        amount: Amount,
        currency: Currency,
    },
    IssueCard {
        currency: Currency,
    },
    FundCard {
        amount: Amount,
        currency: Currency,
    },
    FreezeCard,
    UnfreezeCard,
    Withdraw {
        amount: Amount,
        currency: Currency,
        details: BankDetails,
    },
    UpdateName {
        details: NameDetails,
    },
}

impl OperationRequest {
    /// Stable operation kind name, used for logging and result envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationRequest::Transfer { .. } => "transfer",
            OperationRequest::PayBill { .. } => "pay-bill",
            OperationRequest::FundSavings { .. } => "fund-savings",
            OperationRequest::TopUp { .. } => "top-up",
            OperationRequest::IssueCard { .. } => "issue-card",
            OperationRequest::FundCard { .. } => "fund-card",
            OperationRequest::FreezeCard => "freeze-card",
            OperationRequest::UnfreezeCard => "unfreeze-card",
            OperationRequest::Withdraw { .. } => "withdraw",
            OperationRequest::UpdateName { .. } => "update-name",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransferDetails {
    pub recipient_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BillDetails {
    pub biller: String,
    pub customer_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SavingsDetails {
    pub plan_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BankDetails {
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NameDetails {
    pub new_name: String,
}
