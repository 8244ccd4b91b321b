//! Peripheral abstraction for the vending machine.
//!
//! Device traits ([`KeypadDevice`], [`DisplayDevice`], [`MotorDevice`])
//! define the contract between the machine runner and its peripherals;
//! mock implementations for development without hardware live in
//! [`mock`]. The [`DisplayController`] layers per-line scroll management
//! on top of any display device, and the [`DispenserGrid`] maps slot
//! coordinates onto stepper motors.
//!
//! Traits declare their methods in return-position `impl Future + Send`
//! form (Edition 2024 RPITIT) so device loops and scroll tasks can be
//! spawned onto the runtime; implementations use plain `async fn`. The
//! traits are not object-safe and are consumed through generic type
//! parameters.

pub mod dispenser;
pub mod display;
pub mod error;
pub mod mock;
pub mod traits;

pub use dispenser::DispenserGrid;
pub use display::DisplayController;
pub use error::{HardwareError, Result};
pub use traits::{DisplayDevice, KeypadDevice, KeypadKey, MotorDevice};
