//! Mock stepper motor that records rotation requests.

use crate::{Result, traits::MotorDevice};
use std::sync::{Arc, Mutex};

/// Steps per full coil turn on the simulated stepper.
const STEPS_PER_TURN: u32 = 8;

/// Simulated slot stepper motor.
///
/// Each rotation runs its step sequence with a cooperative yield between
/// steps, mimicking a real driver that must not monopolize the executor
/// during a physically slow operation.
#[derive(Debug)]
pub struct MockMotor {
    rotations: Arc<Mutex<Vec<u32>>>,
}

impl MockMotor {
    /// Create a mock motor and its observer handle.
    pub fn new() -> (Self, MockMotorHandle) {
        let rotations = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                rotations: Arc::clone(&rotations),
            },
            MockMotorHandle { rotations },
        )
    }
}

impl MotorDevice for MockMotor {
    async fn rotate(&mut self, turns: u32) -> Result<()> {
        for _ in 0..turns.saturating_mul(STEPS_PER_TURN) {
            tokio::task::yield_now().await;
        }
        self.rotations
            .lock()
            .expect("mock motor state poisoned")
            .push(turns);
        Ok(())
    }
}

/// Observer handle for a [`MockMotor`].
#[derive(Debug, Clone)]
pub struct MockMotorHandle {
    rotations: Arc<Mutex<Vec<u32>>>,
}

impl MockMotorHandle {
    /// Completed rotation requests, in order.
    #[must_use]
    pub fn rotations(&self) -> Vec<u32> {
        self.rotations
            .lock()
            .expect("mock motor state poisoned")
            .clone()
    }
}
