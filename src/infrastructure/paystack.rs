use crate::config::GatewayConfig;
use crate::domain::money::{Amount, Currency};
use crate::domain::ports::{
    CustomerHandle, IssuedCard, PaymentGateway, PaymentGatewayBox, PaymentSession, RecipientHandle,
};
use crate::domain::request::BankDetails;
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// HTTPS JSON client for the payment gateway.
///
/// Bearer-token authenticated; amounts cross this boundary in minor currency
/// units (x100). Every response's `status` flag is checked before `data` is
/// trusted, and an empty body is a protocol violation, never a success.
pub struct PaystackClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl PaystackClient {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        if config.secret_key.is_empty() {
            return Err(WalletError::Config(config::ConfigError::NotFound(
                "gateway.secret_key".to_string(),
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        })
    }

    /// Boxes the client behind the gateway port.
    pub fn into_gateway(self) -> PaymentGatewayBox {
        Box::new(self)
    }

    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        debug!(%method, path, "gateway call");
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret_key);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(WalletError::Gateway {
                code: status.as_u16().to_string(),
                message: "empty response body".to_string(),
            });
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| WalletError::Gateway {
            code: status.as_u16().to_string(),
            message: format!("malformed response body: {e}"),
        })?;

        // The `status` flag, not the HTTP status, is authoritative.
        if !value.get("status").and_then(Value::as_bool).unwrap_or(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("gateway reported failure")
                .to_string();
            return Err(WalletError::Gateway {
                code: status.as_u16().to_string(),
                message,
            });
        }

        Ok(value.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None).await
    }

    fn str_field(data: &Value, field: &str) -> Result<String> {
        data.get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| WalletError::Gateway {
                code: "protocol".to_string(),
                message: format!("missing field '{field}' in gateway response"),
            })
    }
}

/// The gateway reports duplicate customer registration as a failure message
/// rather than a dedicated code.
fn is_customer_conflict(message: &str) -> bool {
    message.to_lowercase().contains("already exist")
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn create_customer(&self, email: &str, name: &str) -> Result<CustomerHandle> {
        let body = json!({ "email": email, "first_name": name });
        match self.post("/customer", body).await {
            Ok(data) => Ok(CustomerHandle {
                code: Self::str_field(&data, "customer_code")?,
            }),
            // Required fallback: a conflict means the customer is already
            // registered, so look them up and reuse the existing handle.
            Err(WalletError::Gateway { message, .. }) if is_customer_conflict(&message) => {
                let data = self.get(&format!("/customer/{email}")).await?;
                Ok(CustomerHandle {
                    code: Self::str_field(&data, "customer_code")?,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn initialize_transaction(
        &self,
        email: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<PaymentSession> {
        let body = json!({
            "email": email,
            "amount": amount.to_minor_units()?,
            "currency": currency.code(),
        });
        let data = self.post("/transaction/initialize", body).await?;

        Ok(PaymentSession {
            authorization_url: Self::str_field(&data, "authorization_url")?,
            access_code: Self::str_field(&data, "access_code")?,
            reference: Self::str_field(&data, "reference")?,
        })
    }

    async fn issue_card(&self, customer_code: &str, currency: Currency) -> Result<IssuedCard> {
        let body = json!({ "customer": customer_code, "currency": currency.code() });
        let data = self.post("/virtualcard", body).await?;

        let currency = Self::str_field(&data, "currency")?.parse()?;
        Ok(IssuedCard {
            gateway_ref: Self::str_field(&data, "reference")?,
            masked_pan: Self::str_field(&data, "masked_pan")?,
            expiry_month: Self::str_field(&data, "expiry_month")?,
            expiry_year: Self::str_field(&data, "expiry_year")?,
            currency,
        })
    }

    async fn fund_card(
        &self,
        card_ref: &str,
        amount: Amount,
        currency: Currency,
    ) -> Result<String> {
        let body = json!({
            "amount": amount.to_minor_units()?,
            "currency": currency.code(),
        });
        let data = self.post(&format!("/virtualcard/{card_ref}/fund"), body).await?;
        Self::str_field(&data, "reference")
    }

    async fn freeze_card(&self, card_ref: &str) -> Result<()> {
        self.post(&format!("/virtualcard/{card_ref}/freeze"), json!({}))
            .await?;
        Ok(())
    }

    async fn unfreeze_card(&self, card_ref: &str) -> Result<()> {
        self.post(&format!("/virtualcard/{card_ref}/unfreeze"), json!({}))
            .await?;
        Ok(())
    }

    async fn create_payout_recipient(&self, details: &BankDetails) -> Result<RecipientHandle> {
        let body = json!({
            "type": "bank_account",
            "name": details.account_name,
            "account_number": details.account_number,
            "bank_code": details.bank_code,
        });
        let data = self.post("/transferrecipient", body).await?;
        Ok(RecipientHandle {
            code: Self::str_field(&data, "recipient_code")?,
        })
    }

    async fn initiate_payout(
        &self,
        recipient_code: &str,
        amount: Amount,
        currency: Currency,
        reason: &str,
    ) -> Result<String> {
        let body = json!({
            "source": "balance",
            "recipient": recipient_code,
            "amount": amount.to_minor_units()?,
            "currency": currency.code(),
            "reason": reason,
        });
        let data = self.post("/transfer", body).await?;
        Self::str_field(&data, "transfer_code")
    }
}
