//! Per-line display management with cancellable scrolling.
//!
//! Text that fits the display width is written as a single padded frame.
//! Longer text scrolls in a background task, one frame per tick, until
//! something else wants the line: starting a new write or clearing the
//! line cancels the scroll task and awaits its termination before
//! touching the device, so two writers can never interleave frames on
//! the same physical line.

use crate::error::Result;
use crate::traits::DisplayDevice;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;
use vendo_core::constants::SCROLL_FRAME_DELAY;

/// Scroll-aware front for a display device.
///
/// The device sits behind a shared lock because scroll frames are
/// produced from spawned tasks; all direct writes still serialize
/// through that lock.
pub struct DisplayController<D> {
    device: Arc<Mutex<D>>,
    scrollers: HashMap<u8, JoinHandle<()>>,
    scroll_delay: Duration,
}

impl<D: DisplayDevice + 'static> DisplayController<D> {
    /// Wrap a display device with the default scroll cadence.
    pub fn new(device: D) -> Self {
        Self::with_scroll_delay(device, Duration::from_millis(SCROLL_FRAME_DELAY))
    }

    /// Wrap a display device with a custom delay between scroll frames.
    pub fn with_scroll_delay(device: D, scroll_delay: Duration) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
            scrollers: HashMap::new(),
            scroll_delay,
        }
    }

    /// Show text on a line.
    ///
    /// Cancels any scroll currently occupying the line. Text that fits
    /// is written immediately (padded to full width); longer text starts
    /// a background scroll loop and returns at once.
    ///
    /// # Errors
    /// Returns an error if the immediate write fails. Scroll-loop write
    /// failures terminate the loop silently.
    pub async fn show(&mut self, line: u8, text: &str) -> Result<()> {
        self.cancel_scroll(line).await;

        let width = self.device.lock().await.width();
        let chars: Vec<char> = text.chars().collect();

        if chars.len() <= width {
            let padded = format!("{text:<width$}");
            return self.device.lock().await.write_line(line, &padded).await;
        }

        trace!(line, len = chars.len(), "starting scroll");
        let device = Arc::clone(&self.device);
        let delay = self.scroll_delay;
        // Trailing blank gap so the tail separates from the wrapped head.
        let mut reel = chars;
        reel.extend(std::iter::repeat_n(' ', width));

        let handle = tokio::spawn(async move {
            loop {
                for start in 0..=(reel.len() - width) {
                    let frame: String = reel[start..start + width].iter().collect();
                    if device.lock().await.write_line(line, &frame).await.is_err() {
                        return;
                    }
                    tokio::time::sleep(delay).await;
                }
            }
        });
        self.scrollers.insert(line, handle);
        Ok(())
    }

    /// Blank a line, cancelling any scroll on it first.
    ///
    /// # Errors
    /// Returns an error if the device write fails.
    pub async fn clear(&mut self, line: u8) -> Result<()> {
        self.cancel_scroll(line).await;
        self.device.lock().await.clear_line(line).await
    }

    /// Blank every line.
    ///
    /// # Errors
    /// Returns the first device write failure encountered.
    pub async fn clear_all(&mut self) -> Result<()> {
        let lines = self.device.lock().await.lines();
        for line in 0..lines {
            self.clear(line).await?;
        }
        Ok(())
    }

    /// Whether a scroll task currently occupies a line.
    #[must_use]
    pub fn is_scrolling(&self, line: u8) -> bool {
        self.scrollers
            .get(&line)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the scroll task on a line and wait for it to terminate.
    async fn cancel_scroll(&mut self, line: u8) {
        if let Some(handle) = self.scrollers.remove(&line) {
            handle.abort();
            // Await termination so no in-flight frame lands after us.
            let _ = handle.await;
        }
    }
}

impl<D> Drop for DisplayController<D> {
    fn drop(&mut self) {
        for handle in self.scrollers.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDisplay;

    #[tokio::test]
    async fn test_short_text_is_written_padded() {
        let (display, handle) = MockDisplay::with_size(16, 2);
        let mut controller = DisplayController::new(display);

        controller.show(0, "HELLO").await.unwrap();
        assert_eq!(handle.line(0), "HELLO           ");
        assert!(!controller.is_scrolling(0));
    }

    #[tokio::test]
    async fn test_long_text_scrolls() {
        let (display, handle) = MockDisplay::with_size(8, 2);
        let mut controller =
            DisplayController::with_scroll_delay(display, Duration::from_millis(5));

        controller.show(0, "THIS MESSAGE IS LONG").await.unwrap();
        assert!(controller.is_scrolling(0));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(handle.frame_count() > 2);
        assert_eq!(handle.frames()[0].1, "THIS MES");
    }

    #[tokio::test]
    async fn test_new_write_cancels_scroll() {
        let (display, handle) = MockDisplay::with_size(8, 2);
        let mut controller =
            DisplayController::with_scroll_delay(display, Duration::from_millis(5));

        controller.show(0, "THIS MESSAGE IS LONG").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        controller.show(0, "DONE").await.unwrap();
        assert!(!controller.is_scrolling(0));
        assert_eq!(handle.line(0), "DONE    ");

        // No late scroll frame may land after the overwrite.
        let frames_after_write = handle.frame_count();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(handle.frame_count(), frames_after_write);
    }

    #[tokio::test]
    async fn test_scrolls_on_other_lines_survive() {
        let (display, _handle) = MockDisplay::with_size(8, 2);
        let mut controller =
            DisplayController::with_scroll_delay(display, Duration::from_millis(5));

        controller.show(0, "THIS MESSAGE IS LONG").await.unwrap();
        controller.show(1, "OK").await.unwrap();

        assert!(controller.is_scrolling(0));
        assert!(!controller.is_scrolling(1));
    }

    #[tokio::test]
    async fn test_clear_cancels_scroll_and_blanks_line() {
        let (display, handle) = MockDisplay::with_size(8, 2);
        let mut controller =
            DisplayController::with_scroll_delay(display, Duration::from_millis(5));

        controller.show(0, "THIS MESSAGE IS LONG").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        controller.clear(0).await.unwrap();
        assert!(!controller.is_scrolling(0));
        assert_eq!(handle.line(0), "        ");
    }

    #[tokio::test]
    async fn test_clear_all() {
        let (display, handle) = MockDisplay::with_size(8, 2);
        let mut controller = DisplayController::new(display);

        controller.show(0, "A").await.unwrap();
        controller.show(1, "B").await.unwrap();
        controller.clear_all().await.unwrap();

        assert_eq!(handle.line(0), "        ");
        assert_eq!(handle.line(1), "        ");
    }
}
