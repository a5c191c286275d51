/*
 * Everything that ends up on the display goes through here.
 *
 * The display is the one output shared by all three tasks that needs real
 * mutual exclusion: a frame is several bus transfers long and two tasks
 * drawing at the same time would interleave them. `DisplayUpdater` owns the
 * device behind an async mutex and keeps it locked until the frame has been
 * sent and the settle time has passed.
 *
 * The count is read only once the device is locked, so the last frame drawn
 * always shows the count as it was when it was drawn, whatever order the tasks
 * got the lock in.
 */

use core::fmt::Write;

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embedded_hal_async::delay::DelayNs;
use heapless::{String, Vec};

use crate::config::{DISPLAY_SETTLE, FULL_TEXT, LINE_WIDTH, TITLE_TEXT};
use crate::occupancy::SlotCounter;

/// A device that can show a few lines of text.
pub trait TextDisplay {
    type Error;

    /// Clear the device, draw `lines` from the top down and send the result.
    fn render_text(&mut self, lines: &[&str]) -> Result<(), Self::Error>;
}

pub const MAX_LINES: usize = 3;

/// The text of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    occupancy: String<LINE_WIDTH>,
    full: bool,
}

impl Frame {
    pub fn compose(count: usize, capacity: usize) -> Self {
        let mut occupancy = String::new();
        // a count never has more than a handful of digits, it always fits
        let _ = write!(occupancy, "Num. users: {count}");

        Frame {
            occupancy,
            full: count == capacity,
        }
    }

    pub fn lines(&self) -> Vec<&str, MAX_LINES> {
        let mut lines = Vec::new();
        let _ = lines.push(TITLE_TEXT);
        let _ = lines.push(self.occupancy.as_str());
        if self.full {
            let _ = lines.push(FULL_TEXT);
        }
        lines
    }

    pub fn occupancy_line(&self) -> &str {
        &self.occupancy
    }

    pub fn shows_full(&self) -> bool {
        self.full
    }
}

pub struct DisplayUpdater<M: RawMutex, D> {
    device: Mutex<M, D>,
}

impl<M: RawMutex, D: TextDisplay> DisplayUpdater<M, D> {
    pub fn new(device: D) -> Self {
        DisplayUpdater {
            device: Mutex::new(device),
        }
    }

    /// Show the occupancy of `slots` on the display. Waits for as long as
    /// another task is drawing; a refresh is never skipped.
    pub async fn refresh<S: RawMutex>(
        &self,
        slots: &SlotCounter<S>,
        delay: &mut impl DelayNs,
    ) -> Result<(), D::Error> {
        let mut device = self.device.lock().await;
        let frame = Frame::compose(slots.current_count(), slots.capacity());
        let sent = device.render_text(&frame.lines());
        delay.delay_ms(DISPLAY_SETTLE.as_millis() as u32).await;
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CAPACITY;

    #[test]
    fn frame_below_capacity() {
        let frame = Frame::compose(2, CAPACITY);
        assert_eq!(frame.occupancy_line(), "Num. users: 2");
        assert!(!frame.shows_full());
        assert_eq!(frame.lines().as_slice(), &[TITLE_TEXT, "Num. users: 2"]);
    }

    #[test]
    fn frame_at_capacity_adds_the_full_line() {
        let frame = Frame::compose(CAPACITY, CAPACITY);
        assert_eq!(
            frame.lines().as_slice(),
            &[TITLE_TEXT, "Num. users: 8", FULL_TEXT]
        );
    }

    #[test]
    fn lines_fit_the_display() {
        for count in 0..=CAPACITY {
            let frame = Frame::compose(count, CAPACITY);
            assert!(frame.lines().iter().all(|line| line.len() <= LINE_WIDTH));
        }
    }
}
