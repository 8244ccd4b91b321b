//! Mock keypad fed through an internal channel.

use crate::{
    Result,
    traits::{KeypadDevice, KeypadKey},
};
use tokio::sync::mpsc;

/// Simulated matrix keypad.
///
/// Key presses arrive through a channel written by a [`MockKeypadHandle`],
/// so tests and demo binaries can script user input.
///
/// # Examples
///
/// ```
/// use vendo_hardware::mock::MockKeypad;
/// use vendo_hardware::traits::{KeypadDevice, KeypadKey};
///
/// #[tokio::main]
/// async fn main() -> vendo_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.send_key(KeypadKey::Digit(0)).await?;
///     handle.send_key(KeypadKey::Digit(3)).await?;
///
///     assert_eq!(keypad.read_key().await?, KeypadKey::Digit(0));
///     assert_eq!(keypad.read_key().await?, KeypadKey::Digit(3));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    key_rx: mpsc::Receiver<KeypadKey>,
}

impl MockKeypad {
    /// Create a mock keypad and the handle that feeds it.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::channel(32);
        (Self { key_rx }, MockKeypadHandle { key_tx })
    }
}

impl KeypadDevice for MockKeypad {
    async fn read_key(&mut self) -> Result<KeypadKey> {
        self.key_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("Keypad input channel closed"))
    }
}

/// Handle for scripting input to a [`MockKeypad`].
///
/// Cheaply cloneable; can be shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    key_tx: mpsc::Sender<KeypadKey>,
}

impl MockKeypadHandle {
    /// Send one key press.
    ///
    /// # Errors
    /// Returns an error if the keypad has been dropped.
    pub async fn send_key(&self, key: KeypadKey) -> Result<()> {
        self.key_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Send a sequence of digit presses.
    ///
    /// # Errors
    /// Returns an error if any digit is above 9 or the keypad has been
    /// dropped.
    pub async fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            self.send_key(KeypadKey::digit(digit)?).await?;
        }
        Ok(())
    }

    /// Type a slot name as its two digit presses.
    ///
    /// # Errors
    /// Returns an error if the text contains a non-digit or the keypad
    /// has been dropped.
    pub async fn send_slot(&self, slot_name: &str) -> Result<()> {
        for c in slot_name.chars() {
            let digit = c.to_digit(10).ok_or_else(|| {
                crate::HardwareError::invalid_data(format!("not a digit: {c:?}"))
            })?;
            self.send_key(KeypadKey::Digit(digit as u8)).await?;
        }
        Ok(())
    }
}
