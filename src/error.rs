use core::fmt;

use embedded_hal::{digital, pwm};

/// A fault while driving one of the panel's outputs.
///
/// Rejecting an entrant or ignoring an exit from an empty room are not
/// errors; those outcomes are reported by the tasks themselves. These are
/// hardware faults the tasks log before carrying on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    Indicator(digital::ErrorKind),
    Buzzer(pwm::ErrorKind),
    /// The display driver failed to render or transfer a frame.
    Display,
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::Indicator(kind) => write!(f, "indicator LED: {kind}"),
            PanelError::Buzzer(kind) => write!(f, "buzzer: {kind}"),
            PanelError::Display => f.write_str("display transfer failed"),
        }
    }
}

impl core::error::Error for PanelError {}
