//! Slot-coordinate to motor mapping.

use crate::error::{HardwareError, Result};
use crate::traits::MotorDevice;
use tracing::info;
use vendo_core::constants::DISPENSE_TURNS;

/// Grid of stepper motors, one per slot.
///
/// The grid shape mirrors the inventory grid; a dispense resolves the
/// slot coordinate to its motor and runs one dispense rotation.
pub struct DispenserGrid<M> {
    motors: Vec<Vec<M>>,
}

impl<M: MotorDevice> DispenserGrid<M> {
    /// Build a dispenser from a rectangular motor grid.
    ///
    /// # Errors
    /// Returns an error if the grid is empty or ragged.
    pub fn new(motors: Vec<Vec<M>>) -> Result<Self> {
        let cols = motors.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(HardwareError::invalid_data("motor grid must not be empty"));
        }
        if motors.iter().any(|row| row.len() != cols) {
            return Err(HardwareError::invalid_data("motor grid must be rectangular"));
        }
        Ok(Self { motors })
    }

    /// Push one item off the coil at `(row, col)`.
    ///
    /// # Errors
    /// Returns an error if the coordinate has no motor or the rotation
    /// fails.
    pub async fn dispense(&mut self, row: u8, col: u8) -> Result<()> {
        let motor = self
            .motors
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
            .ok_or_else(|| {
                HardwareError::invalid_data(format!("no motor at slot ({row}, {col})"))
            })?;

        info!(row, col, "dispensing");
        motor.rotate(DISPENSE_TURNS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMotor;

    fn motor_grid(rows: usize, cols: usize) -> (Vec<Vec<MockMotor>>, Vec<Vec<crate::mock::MockMotorHandle>>) {
        let mut motors = Vec::new();
        let mut handles = Vec::new();
        for _ in 0..rows {
            let (row_motors, row_handles): (Vec<_>, Vec<_>) =
                (0..cols).map(|_| MockMotor::new()).unzip();
            motors.push(row_motors);
            handles.push(row_handles);
        }
        (motors, handles)
    }

    #[tokio::test]
    async fn test_dispense_rotates_the_right_motor() {
        let (motors, handles) = motor_grid(2, 2);
        let mut grid = DispenserGrid::new(motors).unwrap();

        grid.dispense(1, 0).await.unwrap();

        assert_eq!(handles[1][0].rotations(), vec![DISPENSE_TURNS]);
        assert!(handles[0][0].rotations().is_empty());
        assert!(handles[1][1].rotations().is_empty());
    }

    #[tokio::test]
    async fn test_dispense_out_of_range() {
        let (motors, _handles) = motor_grid(2, 2);
        let mut grid = DispenserGrid::new(motors).unwrap();

        assert!(grid.dispense(2, 0).await.is_err());
        assert!(grid.dispense(0, 2).await.is_err());
    }

    #[test]
    fn test_grid_must_be_rectangular() {
        let (mut motors, _handles) = motor_grid(2, 2);
        motors[1].pop();
        assert!(DispenserGrid::new(motors).is_err());
        assert!(DispenserGrid::<MockMotor>::new(Vec::new()).is_err());
    }
}
