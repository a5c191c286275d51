/*
 * Debouncing for the polled entry and exit buttons.
 *
 * The buttons are active-low with a pull-up. A press only counts when the
 * button still reads down after the debounce hold, and it counts once: the
 * button has to be seen up again before it can register another press.
 * Holding the button down therefore admits (or releases) exactly one person.
 */

use embedded_hal::digital::{self, InputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config::DEBOUNCE_INTERVAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Press {
    /// The button is up.
    Idle,
    /// Still down from a press that already counted.
    Held,
    /// Was down, but up again after the debounce hold.
    Bounce,
    /// A new press.
    Pressed,
}

pub struct Button<B> {
    pin: B,
    armed: bool,
}

impl<B: InputPin> Button<B> {
    pub fn new(pin: B) -> Self {
        Button { pin, armed: true }
    }

    // A pin that cannot be read counts as not pressed.
    fn is_down(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(down) => down,
            Err(e) => {
                warn!("button unreadable: {}", digital::Error::kind(&e));
                false
            }
        }
    }

    pub async fn poll(&mut self, delay: &mut impl DelayNs) -> Press {
        if !self.is_down() {
            self.armed = true;
            return Press::Idle;
        }
        if !self.armed {
            return Press::Held;
        }

        delay.delay_ms(DEBOUNCE_INTERVAL.as_millis() as u32).await;
        if !self.is_down() {
            return Press::Bounce;
        }

        self.armed = false;
        Press::Pressed
    }
}
