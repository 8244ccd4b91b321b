use crate::{
    Result,
    constants::{MAX_GRID_COLS, MAX_GRID_ROWS, SLOT_NAME_LENGTH},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Monetary amount stored as an exact count of cents.
///
/// All price bookkeeping in vendo is done in integer cents so that the
/// "rounded to 2 decimals" rule is exact arithmetic rather than float
/// rounding. Conversion from decimal dollars rounds to the nearest cent.
///
/// `Display` renders the amount the way stock listings show prices:
/// trailing zeros are trimmed down to at least one fractional digit, so
/// 150 cents is `1.5`, 300 cents is `3.0` and 155 cents is `1.55`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create from an exact cent count.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Create from decimal dollars, rounding to the nearest cent.
    #[must_use]
    pub fn from_dollars(dollars: f64) -> Self {
        Money((dollars * 100.0).round() as i64)
    }

    /// The raw cent count (the payment wire unit).
    #[must_use]
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// The amount as decimal dollars.
    #[must_use]
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a unit count.
    #[must_use]
    pub fn times(&self, count: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(count)))
    }

    /// Returns `true` if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / 100;
        let cents = abs % 100;
        if cents == 0 {
            write!(f, "{sign}{dollars}.0")
        } else if cents % 10 == 0 {
            write!(f, "{sign}{dollars}.{}", cents / 10)
        } else {
            write!(f, "{sign}{dollars}.{cents:02}")
        }
    }
}

/// Serialized as decimal dollars, matching the remote inventory wire format.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Ok(Money::from_dollars(dollars))
    }
}

/// Slot address: one row digit followed by one column digit.
///
/// The two-digit encoding is the wire format for slot addresses and caps
/// the grid at 10x10. Parsing rejects anything that is not exactly two
/// ASCII digits; whether the digits fall inside a particular machine's
/// grid is checked by the inventory manager, which knows the dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotName {
    row: u8,
    col: u8,
}

impl SlotName {
    /// Create a slot name from row/column indices.
    ///
    /// # Errors
    /// Returns `Error::InvalidSlotName` if either index is above 9 and so
    /// cannot be encoded as a single digit.
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row >= MAX_GRID_ROWS || col >= MAX_GRID_COLS {
            return Err(Error::invalid_slot_name(format!(
                "Slot indices must be single digits, got ({row}, {col})"
            )));
        }
        Ok(SlotName { row, col })
    }

    /// Row index (0-9).
    #[must_use]
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Column index (0-9).
    #[must_use]
    pub fn col(&self) -> u8 {
        self.col
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.row, self.col)
    }
}

impl std::str::FromStr for SlotName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.chars().count() != SLOT_NAME_LENGTH {
            return Err(Error::invalid_slot_name(format!(
                "Slot name must be {SLOT_NAME_LENGTH} characters long"
            )));
        }
        let mut digits = s.chars().map(|c| c.to_digit(10));
        match (digits.next().flatten(), digits.next().flatten()) {
            (Some(row), Some(col)) => SlotName::new(row as u8, col as u8),
            _ => Err(Error::invalid_slot_name(format!(
                "Slot name must be two digits, got {s:?}"
            ))),
        }
    }
}

impl TryFrom<String> for SlotName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SlotName> for String {
    fn from(slot: SlotName) -> String {
        slot.to_string()
    }
}

/// Machine operating mode.
///
/// Exactly one mode is active at a time for a given machine identity; the
/// remote registry record is the authority and local copies are caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Waiting for a customer or vendor session to begin.
    #[serde(rename = "i")]
    Idle,

    /// Customer purchase in progress.
    #[serde(rename = "t")]
    Transaction,

    /// Vendor inventory edit in progress.
    #[serde(rename = "r")]
    Restocking,
}

impl Mode {
    /// Check whether a transition to `target` is legal from this mode.
    ///
    /// The rules form a hub around `Idle`: a session mode can only be
    /// entered from `Idle`, `Idle` can only be re-entered from a session
    /// mode, and the redundant `Idle -> Idle` transition is rejected so a
    /// caller bug cannot hide behind a no-op.
    #[must_use]
    pub fn can_transition_to(&self, target: Mode) -> bool {
        match (self, target) {
            (Mode::Idle, Mode::Idle) => false,
            (Mode::Idle, _) => true,
            (_, Mode::Idle) => true,
            _ => false,
        }
    }

    /// Single-character wire code used by the machine registry.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            Mode::Idle => 'i',
            Mode::Transaction => 't',
            Mode::Restocking => 'r',
        }
    }

    /// Parse a registry wire code.
    ///
    /// # Errors
    /// Returns `Error::InvalidMode` for an unrecognized code.
    pub fn from_code(c: char) -> Result<Self> {
        match c {
            'i' => Ok(Mode::Idle),
            't' => Ok(Mode::Transaction),
            'r' => Ok(Mode::Restocking),
            _ => Err(Error::invalid_mode(format!("Unknown mode code: {c}"))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Idle => write!(f, "IDLE"),
            Mode::Transaction => write!(f, "TRANSACTION"),
            Mode::Restocking => write!(f, "RESTOCKING"),
        }
    }
}

/// Externally-assigned machine identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(String);

impl MachineId {
    /// Create a machine identifier.
    ///
    /// # Errors
    /// Returns `Error::InvalidMachineId` if the identifier is empty after
    /// trimming.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidMachineId {
                message: "Machine identifier must not be empty".to_string(),
            });
        }
        Ok(MachineId(id))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
