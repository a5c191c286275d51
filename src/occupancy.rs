pub mod semaphore;
use semaphore::BoundedSemaphore;

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::CAPACITY;

/// The room's slots.
///
/// Every occupied slot is one permit held by a bounded counting semaphore, so
/// the occupancy can never leave `0..=CAPACITY` no matter how the entry, exit
/// and reset tasks interleave. None of the operations wait.
pub struct SlotCounter<M: RawMutex> {
    occupied: BoundedSemaphore<M>,
}

impl<M: RawMutex> SlotCounter<M> {
    pub const fn new() -> Self {
        SlotCounter {
            occupied: BoundedSemaphore::new(0, CAPACITY),
        }
    }

    /// Occupy a slot. Returns `false`, and changes nothing, when the room is
    /// full.
    pub fn try_admit(&self) -> bool {
        self.occupied.give()
    }

    /// Free a slot. Returns `false`, and changes nothing, when the room is
    /// empty.
    pub fn try_release(&self) -> bool {
        self.occupied.try_take()
    }

    /*
     * Releases slots until the room is empty and reports how many it freed.
     * No more than `CAPACITY` attempts are made, so this terminates even if
     * other tasks release slots at the same time.
     */
    pub fn drain_all(&self) -> usize {
        let mut drained = 0;
        for _ in 0..self.capacity() {
            if !self.occupied.try_take() {
                break;
            }
            drained += 1;
        }
        drained
    }

    /// The occupancy right now. May already be stale when the caller looks at
    /// it, which is fine for display purposes.
    pub fn current_count(&self) -> usize {
        self.occupied.count()
    }

    pub const fn capacity(&self) -> usize {
        self.occupied.max()
    }
}

impl<M: RawMutex> Default for SlotCounter<M> {
    fn default() -> Self {
        Self::new()
    }
}
