/*
 * The board binding of the occupancy panel.
 *
 * This module is the only part of the program that knows which chip and which
 * pins it runs on. It brings up the peripherals and hands out the pieces the
 * tasks need: two polled buttons, the reset line, the tri-color LED, the PWM
 * buzzer and the SSD1306 display.
 *
 * Pins on the DESPI-M02 (STM32F103VE):
 *   entry button  PE2   active-low, pull-up
 *   exit button   PE3   active-low, pull-up
 *   reset button  PE11  active-low, pull-up, EXTI11 falling edge
 *   LED red/green/blue  PB10 / PB14 / PB12
 *   buzzer        PA6   TIM3 channel 1
 *   display       I2C1, SCL PB6, SDA PB7
 */

use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Input, Level, Output, OutputType, Pull, Speed},
    i2c::{self, I2c},
    mode::Blocking,
    peripherals::TIM3,
    time::Hertz,
    timer::{
        low_level::CountingMode,
        simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel},
    },
};
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use ssd1306::{Ssd1306, mode::BufferedGraphicsMode, prelude::*};

use occupancy_control::{
    Buzzer, Indicator, TextDisplay,
    config::{BUZZER_TONE_HZ, DISPLAY_ADDRESS, DISPLAY_BUS_HZ},
};

type Driver = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

// Baselines of the rows, in pixels from the top.
const FIRST_ROW: i32 = 5;
const ROW_PITCH: i32 = 15;

pub struct Oled {
    driver: Driver,
    style: MonoTextStyle<'static, BinaryColor>,
}

impl Oled {
    fn new(i2c: I2c<'static, Blocking>) -> Self {
        // 0x40: the control byte announcing display data
        let interface = I2CInterface::new(i2c, DISPLAY_ADDRESS, 0x40);
        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        // A display that does not come up is fatal.
        driver.init().unwrap();
        driver.clear_buffer();
        driver.flush().unwrap();

        Oled {
            driver,
            style: MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        }
    }
}

impl TextDisplay for Oled {
    type Error = <Driver as DrawTarget>::Error;

    fn render_text(&mut self, lines: &[&str]) -> Result<(), Self::Error> {
        self.driver.clear_buffer();
        let mut y = FIRST_ROW;
        for line in lines {
            Text::with_baseline(line, Point::new(1, y), self.style, Baseline::Top)
                .draw(&mut self.driver)?;
            y += ROW_PITCH;
        }
        self.driver.flush()
    }
}

pub type Led = Output<'static>;
pub type BuzzerChannel = SimplePwmChannel<'static, TIM3>;

pub struct Board {
    pub entry_button: Input<'static>,
    pub exit_button: Input<'static>,
    pub reset_button: ExtiInput<'static>,
    pub indicator: Indicator<Led>,
    pub buzzer: Buzzer<BuzzerChannel>,
    pub display: Oled,
}

impl Board {
    pub fn init() -> Self {
        let p = embassy_stm32::init(Default::default());

        let indicator = Indicator::new(
            Output::new(p.PB10, Level::Low, Speed::Low),
            Output::new(p.PB14, Level::Low, Speed::Low),
            Output::new(p.PB12, Level::Low, Speed::Low),
        );

        let pwm = SimplePwm::new(
            p.TIM3,
            Some(PwmPin::new_ch1(p.PA6, OutputType::PushPull)),
            None,
            None,
            None,
            Hertz(BUZZER_TONE_HZ),
            CountingMode::EdgeAlignedUp,
        );
        // the compare register starts at zero, so the buzzer is silent
        let mut channel = pwm.split().ch1;
        channel.enable();

        let i2c = I2c::new_blocking(
            p.I2C1,
            p.PB6,
            p.PB7,
            Hertz(DISPLAY_BUS_HZ),
            i2c::Config::default(),
        );

        Board {
            entry_button: Input::new(p.PE2, Pull::Up),
            exit_button: Input::new(p.PE3, Pull::Up),
            reset_button: ExtiInput::new(p.PE11, p.EXTI11, Pull::Up),
            indicator,
            buzzer: Buzzer::new(channel),
            display: Oled::new(i2c),
        }
    }
}
