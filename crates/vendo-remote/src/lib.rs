//! Remote collaborators for the vendo machine stack.
//!
//! This crate holds the seams to everything that lives off the machine:
//! the machine-registry/inventory HTTP service ([`RemoteGateway`]), the
//! payment processor ([`PaymentProcessor`]), and the health-ping reconnect
//! policy used by front-ends. Mock implementations for development and
//! testing live in the [`mock`] module.
//!
//! Traits declare their methods in return-position `impl Future + Send`
//! form (Edition 2024 RPITIT) so generic consumers can be spawned onto the
//! runtime; implementations use plain `async fn`. The traits are not
//! object-safe and are consumed through generic type parameters.

pub mod gateway;
pub mod health;
pub mod http;
pub mod mock;
pub mod payment;

pub use gateway::{MachineRecord, RemoteGateway, SlotRecord};
pub use health::{retry_once_after_reconnect, wait_until_reachable};
pub use http::{HttpGateway, HttpGatewayConfig};
pub use payment::{CardDetails, HttpPaymentClient, PaymentProcessor, PaymentToken};
