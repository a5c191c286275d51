//! Occupancy control for a room with a fixed number of slots.
//!
//! An entry button admits people while there is room, an exit button lets them
//! out, and a reset button (on an interrupt line) empties the room at once. A
//! tri-color LED shows how full the room is, a display shows the head count,
//! and a buzzer complains when someone tries to enter a full room.
//!
//! The crate is the board-independent part of the firmware. It only talks to
//! hardware through `embedded-hal` traits and [`TextDisplay`], so all of it
//! runs and is tested on the host. The STM32 binding lives in the `stm32`
//! binary.
//!
//! Three tasks share the state:
//!
//! - [`EntryTask`] and [`ExitTask`] poll their button and admit or release
//!   through the [`SlotCounter`], a bounded counting semaphore.
//! - [`ResetTask`] sleeps on the [`ResetSignal`] raised by
//!   [`raise_on_falling_edge`] and drains the counter.
//!
//! All of them refresh the [`OutputPanel`], whose display is guarded by a
//! mutex.

#![cfg_attr(not(test), no_std)]

// must come first, the other modules use its macros
mod fmt;

pub mod button;
pub mod config;
mod error;
pub mod occupancy;
pub mod panel;
pub mod reset;
pub mod tasks;

pub use error::PanelError;
pub use occupancy::SlotCounter;
pub use panel::display::{DisplayUpdater, Frame, TextDisplay};
pub use panel::{Buzzer, Indicator, OccupancyLevel, OutputPanel};
pub use reset::{ResetSignal, raise_on_falling_edge};
pub use tasks::{EntryTask, ExitTask, PressOutcome, ResetTask};
