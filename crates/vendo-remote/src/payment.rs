//! Payment collaborator contract and HTTP client.
//!
//! Payment is mediated by the same backend that fronts the card processor:
//! the machine never sees card data beyond token creation, and charges are
//! made against an opaque token in the currency's smallest unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tracing::debug;
use vendo_core::{Error, Money, Result};

/// Card details collected from the customer for token creation.
///
/// Only ever held transiently while requesting a token; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct CardDetails {
    pub card_number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
}

/// Opaque payment authorization token.
///
/// Legally non-empty only while a transaction is in progress; the
/// transaction context drops it on transaction end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken(String);

impl PaymentToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        PaymentToken(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment processor seam.
///
/// Declared in return-position `impl Future` form with a `Send` bound for
/// the same reason as [`RemoteGateway`](crate::RemoteGateway):
/// orchestrators built over a processor may run inside spawned tasks.
pub trait PaymentProcessor: Send + Sync {
    /// Exchange card details for an authorization token.
    ///
    /// # Errors
    /// `Error::Payment` if the processor rejects the card,
    /// `Error::Connectivity` on transport failure.
    fn create_token(&self, card: &CardDetails)
    -> impl Future<Output = Result<PaymentToken>> + Send;

    /// Charge an amount against a previously created token.
    ///
    /// # Errors
    /// `Error::Payment` if the charge is declined,
    /// `Error::Connectivity` on transport failure.
    fn charge(&self, token: &PaymentToken, amount: Money) -> impl Future<Output = Result<()>> + Send;
}

/// HTTP client for the backend's payment routes.
#[derive(Debug, Clone)]
pub struct HttpPaymentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentClient {
    /// Build a payment client for the backend at `base_url`.
    ///
    /// # Errors
    /// Returns `Error::Connectivity` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::connectivity(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl PaymentProcessor for HttpPaymentClient {
    async fn create_token(&self, card: &CardDetails) -> Result<PaymentToken> {
        let url = format!("{}/stripe/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(card)
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::payment(format!(
                "token creation rejected ({status}): {message}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::payment(format!("invalid token response: {e}")))?;
        debug!("payment token created");
        Ok(PaymentToken::new(body.token))
    }

    async fn charge(&self, token: &PaymentToken, amount: Money) -> Result<()> {
        let url = format!("{}/stripe/charge", self.base_url);
        let body = serde_json::json!({
            "token": token.as_str(),
            "amount": amount.cents(),
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("charge request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::payment(format!(
                "charge declined ({status}): {message}"
            )));
        }
        debug!(cents = amount.cents(), "charge accepted");
        Ok(())
    }
}
