//! Error types for configuration, command parsing, tune parsing, and GPIO adapters.
//!
//! Runtime door faults (timeouts, contradicting sensors, a disconnected
//! button ladder) are not errors: they are reported as [`DoorEvent`]s and
//! the state machine keeps running. The types here cover the places where
//! a caller hands the crate something it cannot use.
//!
//! [`DoorEvent`]: crate::events::DoorEvent

use core::fmt;

/// A physical signal on the door controller board.
///
/// Used to say which pin failed in a [`HardwareError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Closed-position reed switch.
    ClosedSensor,
    /// Open-position reed switch.
    OpenSensor,
    /// Remote door button receiver output.
    RemoteButton,
    /// Remote light button receiver output.
    RemoteLightButton,
    /// Opener control relay.
    Relay,
    /// Close warning buzzer.
    Buzzer,
}

impl Signal {
    /// Returns the signal name as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Signal::ClosedSensor => "closed sensor",
            Signal::OpenSensor => "open sensor",
            Signal::RemoteButton => "remote button",
            Signal::RemoteLightButton => "remote light button",
            Signal::Relay => "relay",
            Signal::Buzzer => "buzzer",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a GPIO/ADC backed [`DoorHardware`] adapter.
///
/// [`DoorHardware`]: crate::traits::DoorHardware
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HardwareError {
    /// Reading a digital input failed.
    #[error("failed to read {0}")]
    Read(Signal),
    /// Driving a digital output failed.
    #[error("failed to drive {0}")]
    Write(Signal),
    /// The button ladder ADC conversion failed.
    #[error("button ladder ADC read failed")]
    Adc,
    /// The warning tune handed to the buzzer does not parse.
    #[error("invalid warning tune: {0}")]
    Tune(RtttlError),
}

/// Invalid configuration detected by [`Config::validate`].
///
/// [`Config::validate`]: crate::config::Config::validate
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A travel duration was zero.
    #[error("{0} travel duration must be greater than zero")]
    ZeroTravelDuration(&'static str),
    /// The relay pulse width was zero.
    #[error("control pin active duration must be greater than zero")]
    ZeroPulseWidth,
    /// Publish interval outside the supported window.
    #[error("publish interval {0}ms is outside 250..=1000ms")]
    PublishInterval(u32),
    /// Button ladder thresholds are not strictly increasing.
    #[error("button ladder thresholds must be strictly increasing")]
    ThresholdOrder,
    /// Position tolerance outside `0.0..0.5`.
    #[error("position tolerance must be within 0.0..0.5")]
    Tolerance,
    /// The close warning tune does not parse.
    #[error("close warning tune is invalid: {0}")]
    WarningTune(RtttlError),
}

/// Failure to parse a text door command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    /// Empty input.
    #[error("empty command")]
    Empty,
    /// Not a known keyword or number.
    #[error("unrecognized command")]
    Unrecognized,
    /// A numeric position outside the accepted range.
    #[error("position out of range")]
    OutOfRange,
}

/// Failure to parse an RTTTL tune.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RtttlError {
    /// Missing the `name:defaults:notes` sections.
    #[error("expected name:defaults:notes")]
    Sections,
    /// A default (`d=`, `o=`, `b=`) could not be parsed.
    #[error("invalid default setting")]
    Default,
    /// A note could not be parsed.
    #[error("invalid note at index {0}")]
    Note(usize),
}
