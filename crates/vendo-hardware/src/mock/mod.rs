//! Mock peripherals for testing and development.
//!
//! Each mock comes as a `(device, handle)` pair: the device implements
//! the corresponding trait and the handle drives or observes it from
//! tests and demo binaries.

mod display;
mod keypad;
mod motor;

pub use display::{MockDisplay, MockDisplayHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motor::{MockMotor, MockMotorHandle};
