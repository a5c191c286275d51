/*
 * The three control loops of the panel.
 *
 * Entry and exit poll their button at a fixed rate and never wait for anything
 * but their own delays. Reset sleeps until the reset button's interrupt raises
 * the reset signal. All three share the slot counter and the output panel by
 * reference; nothing in here is a global.
 *
 * Each loop is split into a `step`, which does one iteration and reports what
 * happened, and a `run` that repeats it forever. The firmware spawns `run`.
 */

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::{
    digital::{InputPin, OutputPin},
    pwm::SetDutyCycle,
};
use embedded_hal_async::delay::DelayNs;

use crate::PanelError;
use crate::button::{Button, Press};
use crate::config::POLL_INTERVAL;
use crate::occupancy::SlotCounter;
use crate::panel::{OutputPanel, display::TextDisplay};
use crate::reset::ResetSignal;

/// What one iteration of the entry or exit loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// No new press.
    Idle,
    /// A press that did not survive the debounce hold.
    Bounce,
    /// Someone came in; the occupancy right after.
    Admitted(usize),
    /// The room was full.
    Rejected,
    /// Someone left; the occupancy right after.
    Released(usize),
    /// Exit pressed while the room was empty.
    Absorbed,
}

// Output faults never stop a loop.
fn report(result: Result<(), PanelError>) {
    if let Err(e) = result {
        warn!("output fault: {}", e);
    }
}

async fn poll_interval(delay: &mut impl DelayNs) {
    delay.delay_ms(POLL_INTERVAL.as_millis() as u32).await;
}

pub struct EntryTask<'a, M: RawMutex, B, Y, L, P, D> {
    button: Button<B>,
    delay: Y,
    slots: &'a SlotCounter<M>,
    panel: &'a OutputPanel<M, L, P, D>,
}

impl<'a, M, B, Y, L, P, D> EntryTask<'a, M, B, Y, L, P, D>
where
    M: RawMutex,
    B: InputPin,
    Y: DelayNs,
    L: OutputPin,
    P: SetDutyCycle,
    D: TextDisplay,
{
    pub fn new(
        button: B,
        delay: Y,
        slots: &'a SlotCounter<M>,
        panel: &'a OutputPanel<M, L, P, D>,
    ) -> Self {
        EntryTask {
            button: Button::new(button),
            delay,
            slots,
            panel,
        }
    }

    pub async fn run(mut self) -> ! {
        self.show_current().await;
        loop {
            self.step().await;
        }
    }

    /// Bring display and LED in line with the counter, e.g. right after boot.
    pub async fn show_current(&mut self) {
        report(self.panel.refresh_display(self.slots, &mut self.delay).await);
        let count = self.slots.current_count();
        report(self.panel.refresh_indicator(count, self.slots.capacity()));
    }

    pub async fn step(&mut self) -> PressOutcome {
        let outcome = match self.button.poll(&mut self.delay).await {
            Press::Pressed => self.admit().await,
            Press::Bounce => PressOutcome::Bounce,
            Press::Idle | Press::Held => PressOutcome::Idle,
        };
        poll_interval(&mut self.delay).await;
        outcome
    }

    async fn admit(&mut self) -> PressOutcome {
        let capacity = self.slots.capacity();

        if self.slots.try_admit() {
            let count = self.slots.current_count();
            info!("admitted, {} of {} slots taken", count, capacity);
            report(self.panel.refresh_indicator(count, capacity));
            report(self.panel.refresh_display(self.slots, &mut self.delay).await);
            PressOutcome::Admitted(count)
        } else {
            debug!("room full, entry rejected");
            report(self.panel.reject_cue(&mut self.delay).await);
            report(self.panel.refresh_display(self.slots, &mut self.delay).await);
            PressOutcome::Rejected
        }
    }
}

pub struct ExitTask<'a, M: RawMutex, B, Y, L, P, D> {
    button: Button<B>,
    delay: Y,
    slots: &'a SlotCounter<M>,
    panel: &'a OutputPanel<M, L, P, D>,
}

impl<'a, M, B, Y, L, P, D> ExitTask<'a, M, B, Y, L, P, D>
where
    M: RawMutex,
    B: InputPin,
    Y: DelayNs,
    L: OutputPin,
    P: SetDutyCycle,
    D: TextDisplay,
{
    pub fn new(
        button: B,
        delay: Y,
        slots: &'a SlotCounter<M>,
        panel: &'a OutputPanel<M, L, P, D>,
    ) -> Self {
        ExitTask {
            button: Button::new(button),
            delay,
            slots,
            panel,
        }
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    pub async fn step(&mut self) -> PressOutcome {
        let outcome = match self.button.poll(&mut self.delay).await {
            Press::Pressed => self.release().await,
            Press::Bounce => PressOutcome::Bounce,
            Press::Idle | Press::Held => PressOutcome::Idle,
        };
        poll_interval(&mut self.delay).await;
        outcome
    }

    async fn release(&mut self) -> PressOutcome {
        if !self.slots.try_release() {
            debug!("room empty, exit ignored");
            return PressOutcome::Absorbed;
        }

        let capacity = self.slots.capacity();
        let count = self.slots.current_count();
        info!("released, {} of {} slots taken", count, capacity);
        report(self.panel.refresh_indicator(count, capacity));
        report(self.panel.refresh_display(self.slots, &mut self.delay).await);
        PressOutcome::Released(count)
    }
}

pub struct ResetTask<'a, M: RawMutex, Y, L, P, D> {
    reset: &'a ResetSignal<M>,
    delay: Y,
    slots: &'a SlotCounter<M>,
    panel: &'a OutputPanel<M, L, P, D>,
}

impl<'a, M, Y, L, P, D> ResetTask<'a, M, Y, L, P, D>
where
    M: RawMutex,
    Y: DelayNs,
    L: OutputPin,
    P: SetDutyCycle,
    D: TextDisplay,
{
    pub fn new(
        reset: &'a ResetSignal<M>,
        delay: Y,
        slots: &'a SlotCounter<M>,
        panel: &'a OutputPanel<M, L, P, D>,
    ) -> Self {
        ResetTask {
            reset,
            delay,
            slots,
            panel,
        }
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    /// Wait for the next reset and carry it out. Returns how many slots were
    /// freed.
    pub async fn step(&mut self) -> usize {
        self.reset.wait().await;

        let drained = self.slots.drain_all();
        info!("reset, {} slots freed", drained);

        report(self.panel.reset_cue(&mut self.delay).await);

        report(self.panel.refresh_display(self.slots, &mut self.delay).await);
        let count = self.slots.current_count();
        report(self.panel.refresh_indicator(count, self.slots.capacity()));
        drained
    }
}
