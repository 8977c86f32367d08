//! Simulated garage door opener.
//!
//! [`SimulatedDoor`] models the physical side of the system: a single-button
//! opener that cycles open, stop, close, stop on each relay pulse, a door
//! that travels at a fixed rate, and reed sensors at both ends. It lets the
//! controller run end to end on a desktop.
//!
//! Time comes from a [`Clock`], so tests drive it with a shared
//! [`MockClock`](crate::hal::MockClock) and the `door_sim` binary with
//! [`StdClock`](crate::hal::StdClock).
//!
//! # Example
//!
//! ```rust
//! use rs_garage::hal::{MockClock, SimulatedDoor};
//! use rs_garage::traits::DoorHardware;
//!
//! let clock = MockClock::new();
//! let mut door = SimulatedDoor::closed(clock.clone(), 10_000, 10_000);
//!
//! door.set_relay(true).unwrap();
//! door.set_relay(false).unwrap();
//! clock.advance(10_000);
//! assert!(door.open_sensor().unwrap());
//! ```

use log::{debug, trace};

use crate::error::HardwareError;
use crate::hal::mock::LADDER_IDLE;
use crate::rtttl::Tune;
use crate::traits::{Clock, DoorHardware};

/// What the opener motor is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorState {
    /// Driving towards open.
    Opening,
    /// Driving towards closed.
    Closing,
    /// Stopped until the next pulse.
    Stopped {
        /// True if the next pulse opens.
        opens_next: bool,
    },
}

/// Physical door and opener model.
#[derive(Debug)]
pub struct SimulatedDoor<C: Clock> {
    clock: C,
    open_ms: u32,
    close_ms: u32,
    position: f32,
    motor: MotorState,
    last_update_ms: u64,
    relay: bool,
    warning_until_ms: Option<u64>,
    /// Door stuck: the motor runs but the door does not move.
    pub jammed: bool,
    /// Reverse when closing reaches this position (obstruction).
    pub obstruction_at: Option<f32>,
    /// Remote door button level.
    pub remote: bool,
    /// Remote light button level.
    pub remote_light: bool,
    /// Raw local ladder reading.
    pub ladder: u16,
    /// Relay activations seen.
    pub pulse_count: u32,
}

impl<C: Clock> SimulatedDoor<C> {
    /// Door at `position` with the motor stopped.
    pub fn new(clock: C, open_ms: u32, close_ms: u32, position: f32) -> Self {
        let position = position.clamp(0.0, 1.0);
        let last_update_ms = clock.now_ms();
        Self {
            clock,
            open_ms: open_ms.max(1),
            close_ms: close_ms.max(1),
            position,
            motor: MotorState::Stopped {
                opens_next: position < 1.0,
            },
            last_update_ms,
            relay: false,
            warning_until_ms: None,
            jammed: false,
            obstruction_at: None,
            remote: false,
            remote_light: false,
            ladder: LADDER_IDLE,
            pulse_count: 0,
        }
    }

    /// Door resting closed.
    pub fn closed(clock: C, open_ms: u32, close_ms: u32) -> Self {
        Self::new(clock, open_ms, close_ms, 0.0)
    }

    /// Door resting open.
    pub fn open(clock: C, open_ms: u32, close_ms: u32) -> Self {
        Self::new(clock, open_ms, close_ms, 1.0)
    }

    /// True physical position after advancing to the current time.
    pub fn position(&mut self) -> f32 {
        self.advance();
        self.position
    }

    /// Motor state after advancing to the current time.
    pub fn motor(&mut self) -> MotorState {
        self.advance();
        self.motor
    }

    /// Move the model forward to the clock's current time.
    pub fn advance(&mut self) {
        let now = self.clock.now_ms();
        let elapsed = now.saturating_sub(self.last_update_ms);
        self.last_update_ms = now;
        if elapsed == 0 || self.jammed {
            return;
        }

        match self.motor {
            MotorState::Opening => {
                self.position += elapsed as f32 / self.open_ms as f32;
                if self.position >= 1.0 {
                    self.position = 1.0;
                    self.motor = MotorState::Stopped { opens_next: false };
                    debug!("sim: door reached open");
                }
            }
            MotorState::Closing => {
                self.position -= elapsed as f32 / self.close_ms as f32;
                if let Some(at) = self.obstruction_at {
                    if self.position <= at {
                        // Opener safety reverse
                        self.position = at;
                        self.obstruction_at = None;
                        self.motor = MotorState::Opening;
                        debug!("sim: obstruction, reversing");
                        return;
                    }
                }
                if self.position <= 0.0 {
                    self.position = 0.0;
                    self.motor = MotorState::Stopped { opens_next: true };
                    debug!("sim: door reached closed");
                }
            }
            MotorState::Stopped { .. } => {}
        }
    }

    fn press(&mut self) {
        self.advance();
        self.pulse_count += 1;
        self.motor = match self.motor {
            MotorState::Opening => MotorState::Stopped { opens_next: false },
            MotorState::Closing => MotorState::Stopped { opens_next: true },
            MotorState::Stopped { opens_next: true } => MotorState::Opening,
            MotorState::Stopped { opens_next: false } => MotorState::Closing,
        };
        trace!("sim: opener now {:?}", self.motor);
    }
}

impl<C: Clock> DoorHardware for SimulatedDoor<C> {
    type Error = HardwareError;

    fn closed_sensor(&mut self) -> Result<bool, HardwareError> {
        self.advance();
        Ok(self.position <= 0.0)
    }

    fn open_sensor(&mut self) -> Result<bool, HardwareError> {
        self.advance();
        Ok(self.position >= 1.0)
    }

    fn remote_button(&mut self) -> Result<bool, HardwareError> {
        Ok(self.remote)
    }

    fn remote_light_button(&mut self) -> Result<bool, HardwareError> {
        Ok(self.remote_light)
    }

    fn read_button_ladder(&mut self) -> Result<u16, HardwareError> {
        Ok(self.ladder)
    }

    fn set_relay(&mut self, active: bool) -> Result<(), HardwareError> {
        if active && !self.relay {
            self.press();
        }
        self.relay = active;
        Ok(())
    }

    fn play_warning(&mut self, tune: &str) -> Result<(), HardwareError> {
        let tune = Tune::parse(tune).map_err(HardwareError::Tune)?;
        self.warning_until_ms = Some(self.clock.now_ms() + tune.duration_ms() as u64);
        Ok(())
    }

    fn stop_warning(&mut self) -> Result<(), HardwareError> {
        self.warning_until_ms = None;
        Ok(())
    }

    fn warning_playing(&self) -> bool {
        self.warning_until_ms
            .is_some_and(|until| self.clock.now_ms() < until)
    }
}
