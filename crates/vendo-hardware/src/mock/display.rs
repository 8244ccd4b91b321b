//! Mock character LCD that records every frame written to it.

use crate::{
    Result,
    traits::DisplayDevice,
};
use std::sync::{Arc, Mutex, MutexGuard};
use vendo_core::constants::{DISPLAY_LINES, DISPLAY_WIDTH};

#[derive(Debug)]
struct DisplayState {
    lines: Vec<String>,
    frames: Vec<(u8, String)>,
}

/// Simulated character LCD.
///
/// Stores the current content of each line and a log of every frame
/// written, so tests can assert both the final state and the frame
/// sequence (useful for scroll behavior).
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
    width: usize,
    line_count: u8,
}

impl MockDisplay {
    /// Create a display with the standard machine dimensions.
    pub fn new() -> (Self, MockDisplayHandle) {
        Self::with_size(DISPLAY_WIDTH, DISPLAY_LINES)
    }

    /// Create a display with custom dimensions.
    pub fn with_size(width: usize, line_count: u8) -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState {
            lines: vec![" ".repeat(width); line_count as usize],
            frames: Vec::new(),
        }));
        let display = Self {
            state: Arc::clone(&state),
            width,
            line_count,
        };
        (display, MockDisplayHandle { state })
    }

    fn check_line(&self, line: u8) -> Result<()> {
        if line >= self.line_count {
            return Err(crate::HardwareError::invalid_data(format!(
                "line {line} out of range (display has {} lines)",
                self.line_count
            )));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().expect("mock display state poisoned")
    }
}

impl DisplayDevice for MockDisplay {
    fn width(&self) -> usize {
        self.width
    }

    fn lines(&self) -> u8 {
        self.line_count
    }

    async fn write_line(&mut self, line: u8, text: &str) -> Result<()> {
        self.check_line(line)?;
        let mut state = self.lock();
        state.lines[line as usize] = text.to_string();
        state.frames.push((line, text.to_string()));
        Ok(())
    }

    async fn clear_line(&mut self, line: u8) -> Result<()> {
        self.check_line(line)?;
        let blank = " ".repeat(self.width);
        let mut state = self.lock();
        state.lines[line as usize] = blank.clone();
        state.frames.push((line, blank));
        Ok(())
    }
}

/// Observer handle for a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().expect("mock display state poisoned")
    }

    /// Current content of a line.
    #[must_use]
    pub fn line(&self, line: u8) -> String {
        self.lock().lines[line as usize].clone()
    }

    /// Every frame written so far, in order.
    #[must_use]
    pub fn frames(&self) -> Vec<(u8, String)> {
        self.lock().frames.clone()
    }

    /// Number of frames written so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.lock().frames.len()
    }
}
