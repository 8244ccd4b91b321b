//! Machine configuration file.
//!
//! Each deployed machine carries a small JSON file binding it to its
//! identity and declared dimensions:
//!
//! ```json
//! {
//!     "hardware_id": "vm-506-19",
//!     "rows": 3,
//!     "columns": 3,
//!     "remote_url": "http://localhost:8080"
//! }
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

fn default_remote_url() -> String {
    "http://localhost:8080".to_string()
}

/// Per-machine deployment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    /// Externally-assigned machine identity.
    pub hardware_id: String,

    /// Declared grid rows; must match the remote registration.
    pub rows: u8,

    /// Declared grid columns; must match the remote registration.
    pub columns: u8,

    /// Base URL of the registry/payment backend.
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
}

impl MachineConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading machine config {}", path.display()))?;
        let config: MachineConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing machine config {}", path.display()))?;
        Ok(config)
    }
}
