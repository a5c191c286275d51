/*
 * The counting semaphore behind the slot counter.
 *
 * Unlike the semaphores in `embassy_sync`, this one has an upper bound and
 * lets callers look at its value without taking anything. Giving at the bound
 * and taking at zero both fail immediately; nothing here ever waits.
 */

use core::cell::Cell;
use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

pub struct BoundedSemaphore<M: RawMutex> {
    permits: Mutex<M, Cell<usize>>,
    max: usize,
}

impl<M: RawMutex> BoundedSemaphore<M> {
    pub const fn new(initial: usize, max: usize) -> Self {
        assert!(initial <= max);
        Self {
            permits: Mutex::new(Cell::new(initial)),
            max,
        }
    }

    /// Add one permit, unless the semaphore already holds `max`.
    pub fn give(&self) -> bool {
        self.permits.lock(|permits| {
            let value = permits.get();
            if value < self.max {
                permits.set(value + 1);
                true
            } else {
                false
            }
        })
    }

    /// Take one permit without waiting.
    pub fn try_take(&self) -> bool {
        self.permits.lock(|permits| {
            let value = permits.get();
            if value > 0 {
                permits.set(value - 1);
                true
            } else {
                false
            }
        })
    }

    pub fn count(&self) -> usize {
        self.permits.lock(|permits| permits.get())
    }

    pub const fn max(&self) -> usize {
        self.max
    }
}
