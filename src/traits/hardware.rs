//! Hardware abstraction traits for the door controller board.
//!
//! This module defines the narrow hardware interfaces that let the
//! controller run against real GPIO on an ESP32, a simulated opener on the
//! desktop, or plain mocks in tests.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`DoorHardware`] | Sensors, remote buttons, ladder ADC, relay, warning buzzer |
//! | [`ButtonLadder`] | Raw reads of the local button resistor ladder |
//! | [`WarningPlayer`] | Non-blocking close warning tune playback |
//! | [`Clock`] | Monotonic millisecond time source |
//!
//! # Implementation
//!
//! For testing and desktop development, use [`MockDoorHardware`] or
//! [`SimulatedDoor`]. For boards wired with `embedded-hal` pins, use
//! [`GpioDoorHardware`].
//!
//! # Example
//!
//! ```rust
//! use rs_garage::traits::DoorHardware;
//! use rs_garage::hal::MockDoorHardware;
//!
//! let mut hw = MockDoorHardware::closed();
//! assert!(hw.closed_sensor().unwrap());
//! assert!(!hw.open_sensor().unwrap());
//!
//! hw.set_relay(true).unwrap();
//! hw.set_relay(false).unwrap();
//! assert_eq!(hw.pulse_count, 1);
//! ```
//!
//! [`MockDoorHardware`]: crate::hal::MockDoorHardware
//! [`SimulatedDoor`]: crate::hal::SimulatedDoor
//! [`GpioDoorHardware`]: crate::hal::GpioDoorHardware

/// All hardware the door controller touches.
///
/// Inputs are read on every [`GarageDoor::tick`]; there are no callbacks.
/// The relay is a single momentary contact wired in parallel with the
/// opener's wall button, so the controller only ever pulses it.
///
/// # Implementation Notes
///
/// - Sensor and button reads return `true` when *active*, whatever the
///   electrical polarity of the pin.
/// - `read_button_ladder` returns a value scaled to 0..1023.
/// - The warning methods may be backed by a [`WarningPlayer`].
///
/// [`GarageDoor::tick`]: crate::GarageDoor::tick
pub trait DoorHardware {
    /// Error type for hardware operations.
    type Error;

    /// True when the door is on the closed-position sensor.
    fn closed_sensor(&mut self) -> Result<bool, Self::Error>;

    /// True when the door is on the open-position sensor.
    fn open_sensor(&mut self) -> Result<bool, Self::Error>;

    /// True while the remote door button is held.
    fn remote_button(&mut self) -> Result<bool, Self::Error>;

    /// True while the remote light button is held.
    fn remote_light_button(&mut self) -> Result<bool, Self::Error>;

    /// Raw local button ladder reading (0..1023).
    fn read_button_ladder(&mut self) -> Result<u16, Self::Error>;

    /// Drive the opener relay.
    fn set_relay(&mut self, active: bool) -> Result<(), Self::Error>;

    /// Start playing the close warning tune.
    fn play_warning(&mut self, tune: &str) -> Result<(), Self::Error>;

    /// Stop the close warning tune.
    fn stop_warning(&mut self) -> Result<(), Self::Error>;

    /// True while the close warning tune is still playing.
    fn warning_playing(&self) -> bool;

    /// Advance warning playback. Called once per tick.
    ///
    /// Default implementation does nothing, for players that run on
    /// their own timer.
    fn poll_warning(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Local button resistor ladder on a single ADC channel.
pub trait ButtonLadder {
    /// Error type for ADC reads.
    type Error;

    /// Read the ladder, scaled to 0..1023.
    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

/// Audible alert played before an automated close.
///
/// Playback must not block: `play` starts the tune and `poll` advances it.
///
/// # Example
///
/// ```rust
/// use rs_garage::traits::WarningPlayer;
/// use rs_garage::hal::MockWarning;
///
/// let mut warning = MockWarning::new();
/// warning.play("beep:d=4,o=5,b=100:c").unwrap();
/// assert!(warning.is_playing());
///
/// warning.finish();
/// assert!(!warning.is_playing());
/// assert_eq!(warning.play_count, 1);
/// ```
pub trait WarningPlayer {
    /// Error type for playback.
    type Error;

    /// Start playing an RTTTL tune, replacing any tune already playing.
    fn play(&mut self, tune: &str) -> Result<(), Self::Error>;

    /// Stop playback.
    fn stop(&mut self) -> Result<(), Self::Error>;

    /// True until the tune has finished or been stopped.
    fn is_playing(&self) -> bool;

    /// Advance playback. Default implementation does nothing.
    fn poll(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds. On desktop, this can wrap
/// `std::time::Instant`. On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_garage::traits::Clock;
/// use rs_garage::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}
