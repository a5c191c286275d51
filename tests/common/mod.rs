//! A bench of fake hardware for driving the tasks on the host.
//!
//! Every fake writes into one shared trace, so tests can check not only what
//! happened but in which order.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    convert::Infallible,
    rc::Rc,
};

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::{
    digital::{ErrorType, InputPin, OutputPin},
    pwm::{self, SetDutyCycle},
};
use embedded_hal_async::delay::DelayNs;
use occupancy_control::{Buzzer, Indicator, OutputPanel, TextDisplay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Buzzer(bool),
    Delay(u32),
    Frame(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Off,
    Blue,
    Green,
    Yellow,
    Red,
    Invalid,
}

pub type Panel = OutputPanel<NoopRawMutex, Led, Pwm, Screen>;

#[derive(Default)]
pub struct Bench {
    pub trace: Rc<RefCell<Vec<Event>>>,
    leds: Rc<RefCell<[bool; 3]>>,
    entry: SwitchState,
    exit: SwitchState,
    display_fails: Rc<Cell<bool>>,
}

impl Bench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self) -> Panel {
        let led = |index| Led {
            index,
            leds: self.leds.clone(),
        };
        OutputPanel::new(
            Indicator::new(led(0), led(1), led(2)),
            Buzzer::new(Pwm {
                trace: self.trace.clone(),
            }),
            Screen {
                trace: self.trace.clone(),
                fails: self.display_fails.clone(),
            },
        )
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            trace: self.trace.clone(),
        }
    }

    pub fn entry_button(&self) -> Switch {
        Switch {
            state: self.entry.clone(),
        }
    }

    pub fn exit_button(&self) -> Switch {
        Switch {
            state: self.exit.clone(),
        }
    }

    pub fn press_entry(&self) {
        self.entry.down.set(true);
    }

    pub fn release_entry(&self) {
        self.entry.down.set(false);
    }

    /// The next press reads down once, then up again after the debounce hold.
    pub fn flicker_entry(&self) {
        self.entry.script.borrow_mut().extend([true, false]);
    }

    pub fn press_exit(&self) {
        self.exit.down.set(true);
    }

    pub fn release_exit(&self) {
        self.exit.down.set(false);
    }

    pub fn fail_display(&self, fails: bool) {
        self.display_fails.set(fails);
    }

    pub fn color(&self) -> Color {
        match *self.leds.borrow() {
            [false, false, false] => Color::Off,
            [false, false, true] => Color::Blue,
            [false, true, false] => Color::Green,
            [true, true, false] => Color::Yellow,
            [true, false, false] => Color::Red,
            _ => Color::Invalid,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.trace.borrow().clone()
    }

    pub fn clear(&self) {
        self.trace.borrow_mut().clear();
    }

    pub fn frames(&self) -> Vec<Vec<String>> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Frame(lines) => Some(lines.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_frame(&self) -> Option<Vec<String>> {
        self.frames().pop()
    }

    pub fn buzzer_on(&self) -> bool {
        self.trace
            .borrow()
            .iter()
            .rev()
            .find_map(|event| match event {
                Event::Buzzer(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn beeps(&self) -> usize {
        self.trace
            .borrow()
            .iter()
            .filter(|event| **event == Event::Buzzer(true))
            .count()
    }
}

pub fn frame(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

pub struct Led {
    index: usize,
    leds: Rc<RefCell<[bool; 3]>>,
}

impl ErrorType for Led {
    type Error = Infallible;
}

impl OutputPin for Led {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.leds.borrow_mut()[self.index] = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.leds.borrow_mut()[self.index] = true;
        Ok(())
    }
}

pub struct Pwm {
    trace: Rc<RefCell<Vec<Event>>>,
}

impl pwm::ErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        12_500
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.trace.borrow_mut().push(Event::Buzzer(duty > 0));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenFault;

pub struct Screen {
    trace: Rc<RefCell<Vec<Event>>>,
    fails: Rc<Cell<bool>>,
}

impl TextDisplay for Screen {
    type Error = ScreenFault;

    fn render_text(&mut self, lines: &[&str]) -> Result<(), Self::Error> {
        if self.fails.get() {
            return Err(ScreenFault);
        }
        self.trace.borrow_mut().push(Event::Frame(frame(lines)));
        Ok(())
    }
}

#[derive(Default, Clone)]
struct SwitchState {
    down: Rc<Cell<bool>>,
    // readings served before falling back to `down`
    script: Rc<RefCell<VecDeque<bool>>>,
}

pub struct Switch {
    state: SwitchState,
}

impl Switch {
    fn read(&self) -> bool {
        self.state
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.state.down.get())
    }
}

impl ErrorType for Switch {
    type Error = Infallible;
}

impl InputPin for Switch {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read())
    }
}

/// Records every delay and yields once instead of sleeping.
pub struct FakeDelay {
    trace: Rc<RefCell<Vec<Event>>>,
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.trace.borrow_mut().push(Event::Delay(ns / 1_000_000));
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.trace.borrow_mut().push(Event::Delay(ms));
        yield_now().await;
    }
}
