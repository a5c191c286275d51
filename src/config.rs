/*
 * Compile-time configuration of the occupancy panel.
 *
 * Nothing here can be changed at runtime. The capacity in particular is baked
 * into the slot counter, the LED mapping and the display text.
 */

use embassy_time::Duration;

/// Number of slots the room offers.
pub const CAPACITY: usize = 8;

/// How often the entry and exit tasks look at their button.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Hold time after a press is seen, before the press is acted upon.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(200);

/// Length of the single pulse that rejects an entrant when the room is full.
pub const REJECT_PULSE: Duration = Duration::from_millis(100);

/// The reset cue is two pulses of this length...
pub const RESET_PULSE: Duration = Duration::from_millis(100);

/// ...separated by this much silence.
pub const RESET_PULSE_GAP: Duration = Duration::from_millis(100);

/// The display is held for this long after a frame is sent, which also caps
/// the refresh rate.
pub const DISPLAY_SETTLE: Duration = Duration::from_millis(100);

/// Buzzer tone. The buzzer is either on at `BUZZER_DUTY` or off, the tone
/// never changes.
pub const BUZZER_TONE_HZ: u32 = 250;
/// Duty cycle of the buzzer while sounding, as numerator and denominator.
pub const BUZZER_DUTY: (u16, u16) = (60, 12_500);

/// 7-bit I2C address of the display.
pub const DISPLAY_ADDRESS: u8 = 0x3C;
pub const DISPLAY_BUS_HZ: u32 = 400_000;

/// Longest line the display can show with a 6x10 font on 128 pixels.
pub const LINE_WIDTH: usize = 21;

pub const TITLE_TEXT: &str = "Control Panel";
pub const FULL_TEXT: &str = "Capacity maxima";
