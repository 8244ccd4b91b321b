use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Item validation errors
    #[error("Cost of item must be >= 0")]
    NegativeCost,

    #[error("Stock of item cannot go below 0")]
    NegativeStock,

    #[error("Item name must not be empty")]
    EmptyItemName,

    // Slot and grid errors
    #[error("Invalid slot name: {message}")]
    InvalidSlotName { message: String },

    #[error("Invalid dimensions: {message}")]
    InvalidDimensions { message: String },

    #[error(
        "Machine dimensions {local_rows}x{local_cols} do not match remote record {remote_rows}x{remote_cols}"
    )]
    DimensionMismatch {
        local_rows: u8,
        local_cols: u8,
        remote_rows: u8,
        remote_cols: u8,
    },

    #[error("No item at slot {slot}")]
    EmptySlot { slot: String },

    #[error("Invalid machine identifier: {message}")]
    InvalidMachineId { message: String },

    // Mode errors
    #[error("Invalid mode: {message}")]
    InvalidMode { message: String },

    #[error("Cost of slot must be 0 to dispense for free, got {cost}")]
    NotFreeItem { cost: String },

    // Remote gateway errors
    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Query failed with status {status}: {message}")]
    QueryFailure { status: u16, message: String },

    #[error("Connectivity failure: {message}")]
    Connectivity { message: String },

    // Payment collaborator errors
    #[error("Payment error: {message}")]
    Payment { message: String },
}

impl Error {
    /// Create an invalid slot name error.
    pub fn invalid_slot_name(message: impl Into<String>) -> Self {
        Self::InvalidSlotName {
            message: message.into(),
        }
    }

    /// Create an invalid dimensions error.
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            message: message.into(),
        }
    }

    /// Create an empty slot error for the named slot.
    pub fn empty_slot(slot: impl Into<String>) -> Self {
        Self::EmptySlot { slot: slot.into() }
    }

    /// Create an invalid mode error.
    pub fn invalid_mode(message: impl Into<String>) -> Self {
        Self::InvalidMode {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a remote query failure carrying the HTTP status code.
    pub fn query_failure(status: u16, message: impl Into<String>) -> Self {
        Self::QueryFailure {
            status,
            message: message.into(),
        }
    }

    /// Create a connectivity (transport-level) failure.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
        }
    }

    /// Create a payment collaborator error.
    pub fn payment(message: impl Into<String>) -> Self {
        Self::Payment {
            message: message.into(),
        }
    }

    /// Whether this is a transient transport failure the glue layer may retry.
    ///
    /// Validation, mode, and application-level remote failures return `false`;
    /// they must never be retried blindly.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity { .. })
    }

    /// Whether this is a remote "absent" result rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_classification() {
        assert!(Error::connectivity("timeout").is_connectivity());
        assert!(!Error::query_failure(500, "boom").is_connectivity());
        assert!(!Error::invalid_mode("nope").is_connectivity());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::not_found("machine vm-1").is_not_found());
        assert!(!Error::query_failure(400, "bad request").is_not_found());
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = Error::DimensionMismatch {
            local_rows: 3,
            local_cols: 3,
            remote_rows: 4,
            remote_cols: 5,
        };
        assert_eq!(
            err.to_string(),
            "Machine dimensions 3x3 do not match remote record 4x5"
        );
    }
}
