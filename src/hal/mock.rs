//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and sink traits,
//! enabling development and testing on desktop without a door attached.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockDoorHardware`] | [`DoorHardware`] | Settable inputs, counts relay pulses |
//! | [`MockWarning`] | [`WarningPlayer`] | Plays until told to finish |
//! | [`MockLadder`] | [`ButtonLadder`] | Fixed raw ladder value |
//! | [`MockPin`] | `embedded_hal::digital` | Input/output pin with failure injection |
//! | [`MockClock`] | [`Clock`] | Controllable, shareable time source |
//! | [`MockSink`] | [`DoorSink`] | Records publishes and events |
//!
//! # Example
//!
//! ```rust
//! use rs_garage::{Config, DoorController, DoorEvent, DoorState, GarageDoor};
//! use rs_garage::hal::{MockDoorHardware, MockSink};
//!
//! let mut door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
//! door.setup(0, false).unwrap();
//!
//! // Press the local light button
//! door.hardware_mut().ladder = 434;
//! door.tick(100).unwrap();
//!
//! assert_eq!(door.sink().events, vec![DoorEvent::LocalLightButton]);
//! assert_eq!(door.state(), DoorState::Closed);
//! ```
//!
//! [`DoorHardware`]: crate::traits::DoorHardware
//! [`WarningPlayer`]: crate::traits::WarningPlayer
//! [`ButtonLadder`]: crate::traits::ButtonLadder
//! [`Clock`]: crate::traits::Clock
//! [`DoorSink`]: crate::traits::DoorSink

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use crate::door::CoverOperation;
use crate::events::{DoorEvent, Travel};
use crate::traits::{ButtonLadder, Clock, DoorHardware, DoorSink, WarningPlayer};

/// Ladder reading with no button pressed.
pub const LADDER_IDLE: u16 = 133;

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock door hardware for testing.
///
/// Inputs are plain public fields; set them between ticks to simulate the
/// door. Relay activity is counted on each rising edge.
///
/// # Example
///
/// ```rust
/// use rs_garage::hal::MockDoorHardware;
/// use rs_garage::traits::DoorHardware;
///
/// let mut hw = MockDoorHardware::open();
/// assert!(hw.open_sensor().unwrap());
///
/// hw.fail_reads = true;
/// assert_eq!(hw.open_sensor(), Err(()));
/// ```
#[derive(Debug, Clone)]
pub struct MockDoorHardware {
    /// Closed-position sensor.
    pub closed: bool,
    /// Open-position sensor.
    pub open: bool,
    /// Remote door button.
    pub remote: bool,
    /// Remote light button.
    pub remote_light: bool,
    /// Raw ladder value (0..1023).
    pub ladder: u16,
    /// Current relay output.
    pub relay: bool,
    /// Number of relay activations.
    pub pulse_count: u32,
    /// Close warning player.
    pub warning: MockWarning,
    /// Make every input read fail.
    pub fail_reads: bool,
}

impl MockDoorHardware {
    /// Door between sensors, nothing pressed.
    pub fn new() -> Self {
        Self {
            closed: false,
            open: false,
            remote: false,
            remote_light: false,
            ladder: LADDER_IDLE,
            relay: false,
            pulse_count: 0,
            warning: MockWarning::new(),
            fail_reads: false,
        }
    }

    /// Door resting on the closed sensor.
    pub fn closed() -> Self {
        Self {
            closed: true,
            ..Self::new()
        }
    }

    /// Door resting on the open sensor.
    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::new()
        }
    }

    fn read(&self, level: bool) -> Result<bool, ()> {
        if self.fail_reads {
            Err(())
        } else {
            Ok(level)
        }
    }
}

impl Default for MockDoorHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl DoorHardware for MockDoorHardware {
    type Error = ();

    fn closed_sensor(&mut self) -> Result<bool, ()> {
        self.read(self.closed)
    }

    fn open_sensor(&mut self) -> Result<bool, ()> {
        self.read(self.open)
    }

    fn remote_button(&mut self) -> Result<bool, ()> {
        self.read(self.remote)
    }

    fn remote_light_button(&mut self) -> Result<bool, ()> {
        self.read(self.remote_light)
    }

    fn read_button_ladder(&mut self) -> Result<u16, ()> {
        if self.fail_reads {
            return Err(());
        }
        Ok(self.ladder)
    }

    fn set_relay(&mut self, active: bool) -> Result<(), ()> {
        if active && !self.relay {
            self.pulse_count += 1;
        }
        self.relay = active;
        Ok(())
    }

    fn play_warning(&mut self, tune: &str) -> Result<(), ()> {
        self.warning.play(tune)
    }

    fn stop_warning(&mut self) -> Result<(), ()> {
        self.warning.stop()
    }

    fn warning_playing(&self) -> bool {
        self.warning.is_playing()
    }
}

/// Mock warning player.
///
/// Plays until [`finish`](Self::finish) or `stop` is called.
#[derive(Debug, Clone, Default)]
pub struct MockWarning {
    /// True while "playing".
    pub playing: bool,
    /// Number of `play` calls.
    pub play_count: u32,
    /// Number of `stop` calls.
    pub stop_count: u32,
    /// Last tune passed to `play`.
    pub last_tune: String,
}

impl MockWarning {
    /// Creates a silent player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the tune running to its end.
    pub fn finish(&mut self) {
        self.playing = false;
    }
}

impl WarningPlayer for MockWarning {
    type Error = ();

    fn play(&mut self, tune: &str) -> Result<(), ()> {
        self.playing = true;
        self.play_count += 1;
        self.last_tune = String::from(tune);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ()> {
        self.playing = false;
        self.stop_count += 1;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Mock button ladder returning a fixed raw value.
#[derive(Debug, Clone, Copy)]
pub struct MockLadder {
    /// Value returned by `read_raw`.
    pub raw: u16,
}

impl Default for MockLadder {
    fn default() -> Self {
        Self { raw: LADDER_IDLE }
    }
}

impl ButtonLadder for MockLadder {
    type Error = ();

    fn read_raw(&mut self) -> Result<u16, ()> {
        Ok(self.raw)
    }
}

// ============================================================================
// Pins
// ============================================================================

/// Error returned by a [`MockPin`] with `fail` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Mock GPIO pin usable as input or output.
///
/// # Example
///
/// ```rust
/// use embedded_hal::digital::{InputPin, OutputPin};
/// use rs_garage::hal::MockPin;
///
/// let mut pin = MockPin::new();
/// pin.set_high().unwrap();
/// assert!(pin.high);
/// assert!(pin.is_high().unwrap());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MockPin {
    /// Current level.
    pub high: bool,
    /// Make every access fail.
    pub fail: bool,
}

impl MockPin {
    /// Creates a low pin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pin at the given level.
    pub fn at(high: bool) -> Self {
        Self { high, fail: false }
    }

    fn check(&self) -> Result<(), MockPinError> {
        if self.fail {
            Err(MockPinError)
        } else {
            Ok(())
        }
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        self.check()?;
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        self.check()?;
        self.high = true;
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, MockPinError> {
        self.check()?;
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, MockPinError> {
        self.check()?;
        Ok(!self.high)
    }
}

// ============================================================================
// Time
// ============================================================================

/// Mock clock for deterministic testing.
///
/// Clones share the same time, so a test can keep one handle while a
/// player or simulator owns another.
///
/// # Example
///
/// ```rust
/// use rs_garage::hal::MockClock;
/// use rs_garage::traits::Clock;
///
/// let clock = MockClock::new();
/// let shared = clock.clone();
///
/// clock.set(1000);
/// assert_eq!(shared.now_ms(), 1000);
///
/// shared.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    current_ms: Rc<Cell<u64>>,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get() + ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

// ============================================================================
// Sink
// ============================================================================

/// One call made on a [`MockSink`], in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkRecord {
    /// `publish_door_state`
    DoorState(f32, CoverOperation),
    /// `publish_lock_state`
    LockState(bool),
    /// `fire_event`
    Event(DoorEvent),
    /// `publish_travel_time`
    TravelTime(Travel, u64),
}

/// Mock sink recording everything the controller reports.
#[derive(Debug, Default)]
pub struct MockSink {
    /// Every call in order.
    pub records: Vec<SinkRecord>,
    /// Door state publishes.
    pub door_states: Vec<(f32, CoverOperation)>,
    /// Lock state publishes.
    pub lock_states: Vec<bool>,
    /// Fired events.
    pub events: Vec<DoorEvent>,
    /// Reported travel times.
    pub travel_times: Vec<(Travel, u64)>,
}

impl MockSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent door state publish.
    pub fn last_door_state(&self) -> Option<(f32, CoverOperation)> {
        self.door_states.last().copied()
    }

    /// Most recent lock state publish.
    pub fn last_lock_state(&self) -> Option<bool> {
        self.lock_states.last().copied()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.records.clear();
        self.door_states.clear();
        self.lock_states.clear();
        self.events.clear();
        self.travel_times.clear();
    }
}

impl DoorSink for MockSink {
    fn publish_door_state(&mut self, position: f32, operation: CoverOperation) {
        self.records.push(SinkRecord::DoorState(position, operation));
        self.door_states.push((position, operation));
    }

    fn publish_lock_state(&mut self, locked: bool) {
        self.records.push(SinkRecord::LockState(locked));
        self.lock_states.push(locked);
    }

    fn fire_event(&mut self, event: DoorEvent) {
        self.records.push(SinkRecord::Event(event));
        self.events.push(event);
    }

    fn publish_travel_time(&mut self, travel: Travel, duration_ms: u64) {
        self.records.push(SinkRecord::TravelTime(travel, duration_ms));
        self.travel_times.push((travel, duration_ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_counts_rising_edges_only() {
        let mut hw = MockDoorHardware::new();
        hw.set_relay(true).unwrap();
        hw.set_relay(true).unwrap();
        hw.set_relay(false).unwrap();
        hw.set_relay(true).unwrap();
        assert_eq!(hw.pulse_count, 2);
    }

    #[test]
    fn warning_through_hardware() {
        let mut hw = MockDoorHardware::new();
        hw.play_warning("a:d=4,o=5,b=100:c").unwrap();
        assert!(hw.warning_playing());
        assert_eq!(hw.warning.last_tune, "a:d=4,o=5,b=100:c");
        hw.stop_warning().unwrap();
        assert!(!hw.warning_playing());
        assert_eq!(hw.warning.stop_count, 1);
    }

    #[test]
    fn failing_pin() {
        let mut pin = MockPin { high: true, fail: true };
        assert_eq!(pin.is_high(), Err(MockPinError));
        assert_eq!(pin.set_low(), Err(MockPinError));
        assert!(pin.high);
    }

    #[test]
    fn sink_keeps_order() {
        let mut sink = MockSink::new();
        sink.fire_event(DoorEvent::OpenFailed);
        sink.publish_lock_state(true);
        assert_eq!(
            sink.records,
            vec![SinkRecord::Event(DoorEvent::OpenFailed), SinkRecord::LockState(true)]
        );
        sink.clear();
        assert!(sink.records.is_empty());
        assert_eq!(sink.last_lock_state(), None);
    }
}
