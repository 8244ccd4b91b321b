//! HTTP implementation of the remote gateway.
//!
//! Thin JSON-over-HTTP client for the machine registry service. Error
//! mapping is the contract here: 404 becomes `Error::NotFound`, any other
//! non-2xx becomes `Error::QueryFailure` with the status code, and
//! transport failures (refused connection, timeout, DNS) become
//! `Error::Connectivity` so callers can decide between retry and abort.
//!
//! The client deliberately does not retry; reconnect policy lives in
//! [`crate::health`] and is applied by front-ends.

use crate::gateway::{MachineRecord, RemoteGateway, SlotRecord};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use vendo_core::{Error, MachineId, Mode, Result, constants::DEFAULT_REMOTE_TIMEOUT};

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL of the registry service, without a trailing slash.
    pub base_url: String,

    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl HttpGatewayConfig {
    /// Configuration for a service at `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT),
        }
    }
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

/// `reqwest`-backed [`RemoteGateway`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway client from configuration.
    ///
    /// # Errors
    /// Returns `Error::Connectivity` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: HttpGatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::connectivity(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
        let status = response.status().as_u16();
        response.json().await.map_err(|e| {
            Error::query_failure(status, format!("invalid response body for {what}: {e}"))
        })
    }

    /// Map a response into the gateway error taxonomy.
    async fn check(
        result: std::result::Result<reqwest::Response, reqwest::Error>,
        what: &str,
    ) -> Result<reqwest::Response> {
        let response =
            result.map_err(|e| Error::connectivity(format!("request for {what} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found(what));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::query_failure(status.as_u16(), message));
        }
        Ok(response)
    }
}

impl RemoteGateway for HttpGateway {
    async fn get_machine(&self, id: &MachineId) -> Result<MachineRecord> {
        let url = self.url(&["vending-machines", id.as_str()]);
        debug!(machine = %id, "fetching machine record");
        let response = Self::check(
            self.client.get(&url).send().await,
            &format!("machine {id}"),
        )
        .await?;
        Self::decode(response, "machine record").await
    }

    async fn register_machine(
        &self,
        id: &MachineId,
        row_count: u8,
        column_count: u8,
    ) -> Result<MachineRecord> {
        let url = self.url(&["vending-machines"]);
        let body = MachineRecord {
            id: id.clone(),
            name: None,
            row_count,
            column_count,
            mode: Mode::Idle,
        };
        debug!(machine = %id, rows = row_count, cols = column_count, "registering machine");
        let response = Self::check(
            self.client.post(&url).json(&body).send().await,
            &format!("machine registration {id}"),
        )
        .await?;
        Self::decode(response, "machine record").await
    }

    async fn set_machine_mode(&self, id: &MachineId, mode: Mode) -> Result<MachineRecord> {
        let url = self.url(&["vending-machines", id.as_str(), "mode"]);
        let body = serde_json::json!({ "vm_mode": mode });
        debug!(machine = %id, %mode, "writing machine mode");
        let response = Self::check(
            self.client.patch(&url).json(&body).send().await,
            &format!("machine {id}"),
        )
        .await?;
        Self::decode(response, "machine record").await
    }

    async fn set_machine_name(&self, id: &MachineId, name: &str) -> Result<MachineRecord> {
        let url = self.url(&["vending-machines", id.as_str(), "name"]);
        let body = serde_json::json!({ "vm_name": name });
        let response = Self::check(
            self.client.patch(&url).json(&body).send().await,
            &format!("machine {id}"),
        )
        .await?;
        Self::decode(response, "machine record").await
    }

    async fn get_inventory(&self, id: &MachineId) -> Result<Vec<SlotRecord>> {
        let url = self.url(&["inventory", id.as_str()]);
        debug!(machine = %id, "fetching inventory");
        let response = Self::check(
            self.client.get(&url).send().await,
            &format!("inventory of machine {id}"),
        )
        .await?;
        Self::decode(response, "inventory").await
    }

    async fn upsert_inventory(&self, id: &MachineId, changes: &[SlotRecord]) -> Result<()> {
        let url = self.url(&["inventory", id.as_str()]);
        debug!(machine = %id, count = changes.len(), "uploading inventory changes");
        Self::check(
            self.client.put(&url).json(&changes).send().await,
            &format!("inventory of machine {id}"),
        )
        .await?;
        Ok(())
    }
}
