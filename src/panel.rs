/*
 * The panel's outputs: the tri-color occupancy LED, the buzzer and the display.
 *
 * Nothing here remembers the occupancy. Every refresh is handed the count and
 * derives what to show from it, so a refresh that raced another one is fixed
 * by the next.
 */

pub mod display;
use display::{DisplayUpdater, TextDisplay};

use core::cell::RefCell;

use embassy_sync::{
    blocking_mutex::{self, raw::RawMutex},
    mutex::Mutex,
};
use embassy_time::Duration;
use embedded_hal::{
    digital::{self, OutputPin, PinState},
    pwm::{self, SetDutyCycle},
};
use embedded_hal_async::delay::DelayNs;
use enum_ordinalize::Ordinalize;

use crate::PanelError;
use crate::config::{BUZZER_DUTY, REJECT_PULSE, RESET_PULSE, RESET_PULSE_GAP};
use crate::occupancy::SlotCounter;

/// The three single-color lines of the indicator LED.
#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Line {
    Red,
    Green,
    Blue,
}

/// How full the room is, as shown by the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OccupancyLevel {
    /// Blue.
    Empty,
    /// Green.
    Available,
    /// Yellow, one slot left.
    LastSlot,
    /// Red.
    Full,
}

impl OccupancyLevel {
    pub fn of(count: usize, capacity: usize) -> Self {
        if count == 0 {
            OccupancyLevel::Empty
        } else if count >= capacity {
            OccupancyLevel::Full
        } else if count == capacity - 1 {
            OccupancyLevel::LastSlot
        } else {
            OccupancyLevel::Available
        }
    }

    /// Which lines are lit, indexed by `Line::ordinal()`. Yellow is red and
    /// green together; there is no blending.
    pub fn lines(self) -> [bool; Line::VARIANT_COUNT] {
        match self {
            OccupancyLevel::Empty => [false, false, true],
            OccupancyLevel::Available => [false, true, false],
            OccupancyLevel::LastSlot => [true, true, false],
            OccupancyLevel::Full => [true, false, false],
        }
    }
}

pub struct Indicator<L> {
    lines: [L; Line::VARIANT_COUNT],
}

impl<L: OutputPin> Indicator<L> {
    pub fn new(red: L, green: L, blue: L) -> Self {
        Indicator {
            lines: [red, green, blue],
        }
    }

    pub fn show(&mut self, level: OccupancyLevel) -> Result<(), PanelError> {
        for (pin, on) in self.lines.iter_mut().zip(level.lines()) {
            pin.set_state(PinState::from(on))
                .map_err(|e| PanelError::Indicator(digital::Error::kind(&e)))?;
        }
        Ok(())
    }
}

pub struct Buzzer<P> {
    pwm: P,
}

impl<P: SetDutyCycle> Buzzer<P> {
    pub fn new(pwm: P) -> Self {
        Buzzer { pwm }
    }

    fn set(&mut self, on: bool) -> Result<(), PanelError> {
        let result = if on {
            let (num, denom) = BUZZER_DUTY;
            self.pwm.set_duty_cycle_fraction(num, denom)
        } else {
            self.pwm.set_duty_cycle_fully_off()
        };
        result.map_err(|e| PanelError::Buzzer(pwm::Error::kind(&e)))
    }

    pub async fn pulse(
        &mut self,
        duration: Duration,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError> {
        self.set(true)?;
        delay.delay_ms(duration.as_millis() as u32).await;
        self.set(false)
    }
}

/// All outputs of the panel, shared by the entry, exit and reset tasks.
///
/// The LED lines are written inside a short critical section and never wait.
/// Buzzer patterns and display frames take time, so those sit behind async
/// mutexes that hold the device until the pattern or frame is complete.
pub struct OutputPanel<M: RawMutex, L, P, D> {
    indicator: blocking_mutex::Mutex<M, RefCell<Indicator<L>>>,
    buzzer: Mutex<M, Buzzer<P>>,
    display: DisplayUpdater<M, D>,
}

impl<M, L, P, D> OutputPanel<M, L, P, D>
where
    M: RawMutex,
    L: OutputPin,
    P: SetDutyCycle,
    D: TextDisplay,
{
    pub fn new(indicator: Indicator<L>, buzzer: Buzzer<P>, display: D) -> Self {
        OutputPanel {
            indicator: blocking_mutex::Mutex::new(RefCell::new(indicator)),
            buzzer: Mutex::new(buzzer),
            display: DisplayUpdater::new(display),
        }
    }

    pub fn refresh_indicator(&self, count: usize, capacity: usize) -> Result<(), PanelError> {
        let level = OccupancyLevel::of(count, capacity);
        self.indicator
            .lock(|indicator| indicator.borrow_mut().show(level))
    }

    pub async fn refresh_display<S: RawMutex>(
        &self,
        slots: &SlotCounter<S>,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError> {
        self.display
            .refresh(slots, delay)
            .await
            .map_err(|_| PanelError::Display)
    }

    pub async fn sound_buzzer(
        &self,
        duration: Duration,
        delay: &mut impl DelayNs,
    ) -> Result<(), PanelError> {
        self.buzzer.lock().await.pulse(duration, delay).await
    }

    /// One short beep: the room is full.
    pub async fn reject_cue(&self, delay: &mut impl DelayNs) -> Result<(), PanelError> {
        self.sound_buzzer(REJECT_PULSE, delay).await
    }

    /// Two beeps: the room was reset.
    pub async fn reset_cue(&self, delay: &mut impl DelayNs) -> Result<(), PanelError> {
        let mut buzzer = self.buzzer.lock().await;
        buzzer.pulse(RESET_PULSE, delay).await?;
        delay.delay_ms(RESET_PULSE_GAP.as_millis() as u32).await;
        buzzer.pulse(RESET_PULSE, delay).await
    }
}
