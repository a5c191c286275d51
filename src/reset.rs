/*
 * The reset event.
 *
 * The reset button's interrupt handler raises it, the reset task consumes it.
 * It is a single pending flag rather than a queue: any number of raises before
 * the reset task gets around to waiting again amount to one reset.
 */

use core::convert::Infallible;

use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_hal_async::digital::Wait;

pub struct ResetSignal<M: RawMutex> {
    pending: Signal<M, ()>,
}

impl<M: RawMutex> ResetSignal<M> {
    pub const fn new() -> Self {
        ResetSignal {
            pending: Signal::new(),
        }
    }

    /// Mark a reset as pending and wake the reset task.
    ///
    /// Safe to call from an interrupt handler: it neither blocks nor
    /// allocates, it only takes the raw mutex for a few instructions. Use a
    /// `CriticalSectionRawMutex` when the caller runs in interrupt context.
    pub fn raise(&self) {
        self.pending.signal(());
    }

    /// Wait until a reset is pending and clear it.
    pub async fn wait(&self) {
        self.pending.wait().await
    }

    pub fn is_pending(&self) -> bool {
        self.pending.signaled()
    }
}

impl<M: RawMutex> Default for ResetSignal<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// The reset button's handler: raise `reset` on every falling edge of `pin`.
///
/// Meant to run at interrupt priority. It does nothing besides raising the
/// signal, in particular no debouncing; bounces coalesce into the pending
/// reset.
pub async fn raise_on_falling_edge<M, W>(mut pin: W, reset: &ResetSignal<M>) -> !
where
    M: RawMutex,
    W: Wait<Error = Infallible>,
{
    loop {
        let Ok(()) = pin.wait_for_falling_edge().await;
        reset.raise();
    }
}
