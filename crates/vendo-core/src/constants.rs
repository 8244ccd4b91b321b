//! Domain constants shared across the vendo crates.

// ============================================================================
// Grid Limits
// ============================================================================

/// Minimum rows/columns for a machine grid.
pub const MIN_GRID_DIM: u8 = 1;

/// Maximum rows for a machine grid.
///
/// Slot names encode the row as a single decimal digit, which caps the
/// grid at 10 rows (indices 0-9).
pub const MAX_GRID_ROWS: u8 = 10;

/// Maximum columns for a machine grid.
///
/// Slot names encode the column as a single decimal digit, which caps the
/// grid at 10 columns (indices 0-9).
pub const MAX_GRID_COLS: u8 = 10;

/// Length of a slot name: one row digit followed by one column digit.
pub const SLOT_NAME_LENGTH: usize = 2;

/// Placeholder rendered for unoccupied slots in full stock listings.
pub const EMPTY_SLOT_LABEL: &str = "<EMPTY>";

// ============================================================================
// Remote Gateway
// ============================================================================

/// Timeout applied to every remote gateway request (milliseconds).
pub const DEFAULT_REMOTE_TIMEOUT: u64 = 10_000;

/// Interval between health-endpoint polls while waiting for the remote
/// service to become reachable again (milliseconds).
pub const HEALTH_POLL_INTERVAL: u64 = 2_000;

// ============================================================================
// Display Configuration
// ============================================================================

/// Characters per LCD line.
pub const DISPLAY_WIDTH: usize = 16;

/// Number of LCD lines.
pub const DISPLAY_LINES: u8 = 2;

/// Delay between scroll frames for text wider than the display (milliseconds).
pub const SCROLL_FRAME_DELAY: u64 = 300;

// ============================================================================
// Dispensing
// ============================================================================

/// Motor rotations used to push one item off its coil.
pub const DISPENSE_TURNS: u32 = 4;

// ============================================================================
// Default Display Messages
// ============================================================================

/// Idle prompt shown while waiting for a slot selection.
pub const MSG_CHOOSE_SLOT: &str = "CHOOSE SLOT";

/// Shown when a purchase fails because the slot is out of stock or empty.
pub const MSG_OUT_OF_STOCK: &str = "OUT OF STOCK";

/// Shown when the entered slot name does not resolve to a grid slot.
pub const MSG_INVALID_SLOT: &str = "INVALID SLOT";

/// Shown while an item is being pushed off its coil.
pub const MSG_DISPENSING: &str = "DISPENSING";
