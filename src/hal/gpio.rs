//! [`DoorHardware`] over plain `embedded-hal` pins.
//!
//! Any board whose HAL implements `embedded-hal` 1.0 digital traits can
//! run the controller through [`GpioDoorHardware`]: two sensor inputs, two
//! remote button inputs, a relay output, a [`ButtonLadder`] and a
//! [`WarningPlayer`] (usually a [`BuzzerPlayer`](crate::rtttl::BuzzerPlayer)).
//!
//! Pin polarity is configured once in [`Polarity`]; the controller only
//! ever sees "active" or "inactive".
//!
//! # Example
//!
//! ```rust
//! use rs_garage::hal::{GpioDoorHardware, MockClock, MockLadder, MockPin, Polarity};
//! use rs_garage::rtttl::BuzzerPlayer;
//! use rs_garage::traits::DoorHardware;
//!
//! // Reed switch to ground with pull-up: low means door present
//! let mut hw = GpioDoorHardware::new(
//!     MockPin::at(false), // closed sensor
//!     MockPin::at(true),  // open sensor
//!     MockPin::at(true),  // remote door
//!     MockPin::at(true),  // remote light
//!     MockPin::new(),     // relay
//!     MockLadder::default(),
//!     BuzzerPlayer::new(MockPin::new(), MockClock::new()),
//!     Polarity::default(),
//! );
//!
//! assert!(hw.closed_sensor().unwrap());
//! assert!(!hw.open_sensor().unwrap());
//! assert!(!hw.remote_button().unwrap());
//! ```

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{HardwareError, Signal};
use crate::traits::{ButtonLadder, DoorHardware, WarningPlayer};

/// Which electrical level means "active" for each pin group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Polarity {
    /// Sensors read active when low.
    pub sensors_active_low: bool,
    /// Remote buttons read active when low.
    pub buttons_active_low: bool,
    /// Relay is energised by driving the pin low.
    pub relay_active_low: bool,
}

impl Default for Polarity {
    /// Reed switches and buttons to ground with pull-ups, relay driven high.
    fn default() -> Self {
        Self {
            sensors_active_low: true,
            buttons_active_low: true,
            relay_active_low: false,
        }
    }
}

/// Door hardware built from `embedded-hal` pins.
pub struct GpioDoorHardware<CS, OS, RB, RL, R, L, W> {
    closed: CS,
    open: OS,
    remote: RB,
    remote_light: RL,
    relay: R,
    ladder: L,
    warning: W,
    polarity: Polarity,
}

impl<CS, OS, RB, RL, R, L, W> GpioDoorHardware<CS, OS, RB, RL, R, L, W>
where
    CS: InputPin,
    OS: InputPin,
    RB: InputPin,
    RL: InputPin,
    R: OutputPin,
    L: ButtonLadder,
    W: WarningPlayer<Error = HardwareError>,
{
    /// Wire up the hardware. The relay is not touched until `setup`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        closed: CS,
        open: OS,
        remote: RB,
        remote_light: RL,
        relay: R,
        ladder: L,
        warning: W,
        polarity: Polarity,
    ) -> Self {
        Self {
            closed,
            open,
            remote,
            remote_light,
            relay,
            ladder,
            warning,
            polarity,
        }
    }

    /// Borrow the warning player.
    pub fn warning(&self) -> &W {
        &self.warning
    }

    /// Borrow the relay pin.
    pub fn relay(&self) -> &R {
        &self.relay
    }
}

fn read_active<P: InputPin>(pin: &mut P, active_low: bool, signal: Signal) -> Result<bool, HardwareError> {
    let high = pin.is_high().map_err(|_| HardwareError::Read(signal))?;
    Ok(high != active_low)
}

impl<CS, OS, RB, RL, R, L, W> DoorHardware for GpioDoorHardware<CS, OS, RB, RL, R, L, W>
where
    CS: InputPin,
    OS: InputPin,
    RB: InputPin,
    RL: InputPin,
    R: OutputPin,
    L: ButtonLadder,
    W: WarningPlayer<Error = HardwareError>,
{
    type Error = HardwareError;

    fn closed_sensor(&mut self) -> Result<bool, HardwareError> {
        read_active(&mut self.closed, self.polarity.sensors_active_low, Signal::ClosedSensor)
    }

    fn open_sensor(&mut self) -> Result<bool, HardwareError> {
        read_active(&mut self.open, self.polarity.sensors_active_low, Signal::OpenSensor)
    }

    fn remote_button(&mut self) -> Result<bool, HardwareError> {
        read_active(&mut self.remote, self.polarity.buttons_active_low, Signal::RemoteButton)
    }

    fn remote_light_button(&mut self) -> Result<bool, HardwareError> {
        read_active(
            &mut self.remote_light,
            self.polarity.buttons_active_low,
            Signal::RemoteLightButton,
        )
    }

    fn read_button_ladder(&mut self) -> Result<u16, HardwareError> {
        self.ladder.read_raw().map_err(|_| HardwareError::Adc)
    }

    fn set_relay(&mut self, active: bool) -> Result<(), HardwareError> {
        let result = if active != self.polarity.relay_active_low {
            self.relay.set_high()
        } else {
            self.relay.set_low()
        };
        result.map_err(|_| HardwareError::Write(Signal::Relay))
    }

    fn play_warning(&mut self, tune: &str) -> Result<(), HardwareError> {
        self.warning.play(tune)
    }

    fn stop_warning(&mut self) -> Result<(), HardwareError> {
        self.warning.stop()
    }

    fn warning_playing(&self) -> bool {
        self.warning.is_playing()
    }

    fn poll_warning(&mut self) -> Result<(), HardwareError> {
        self.warning.poll()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockClock, MockLadder, MockPin};
    use crate::rtttl::BuzzerPlayer;

    type Hw = GpioDoorHardware<
        MockPin,
        MockPin,
        MockPin,
        MockPin,
        MockPin,
        MockLadder,
        BuzzerPlayer<MockPin, MockClock>,
    >;

    fn hardware(clock: &MockClock) -> Hw {
        GpioDoorHardware::new(
            MockPin::at(true),
            MockPin::at(true),
            MockPin::at(true),
            MockPin::at(true),
            MockPin::new(),
            MockLadder { raw: 714 },
            BuzzerPlayer::new(MockPin::new(), clock.clone()),
            Polarity::default(),
        )
    }

    #[test]
    fn relay_polarity() {
        let clock = MockClock::new();
        let mut hw = hardware(&clock);
        hw.set_relay(true).unwrap();
        assert!(hw.relay().high);

        hw.polarity.relay_active_low = true;
        hw.set_relay(true).unwrap();
        assert!(!hw.relay().high);
        hw.set_relay(false).unwrap();
        assert!(hw.relay().high);
    }

    #[test]
    fn active_high_sensors() {
        let clock = MockClock::new();
        let mut hw = hardware(&clock);
        assert!(!hw.closed_sensor().unwrap());
        hw.polarity.sensors_active_low = false;
        assert!(hw.closed_sensor().unwrap());
    }

    #[test]
    fn pin_errors_name_the_signal() {
        let clock = MockClock::new();
        let mut hw = hardware(&clock);
        hw.open.fail = true;
        hw.relay.fail = true;
        assert_eq!(hw.open_sensor(), Err(HardwareError::Read(Signal::OpenSensor)));
        assert_eq!(hw.set_relay(true), Err(HardwareError::Write(Signal::Relay)));
    }

    #[test]
    fn ladder_and_warning_pass_through() {
        let clock = MockClock::new();
        let mut hw = hardware(&clock);
        assert_eq!(hw.read_button_ladder(), Ok(714));

        hw.play_warning("n:d=4,o=5,b=120:c").unwrap();
        assert!(hw.warning_playing());
        clock.set(600);
        hw.poll_warning().unwrap();
        assert!(!hw.warning_playing());
    }
}
