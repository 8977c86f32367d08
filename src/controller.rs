//! Garage door state machine.
//!
//! This module provides [`GarageDoor`], the central component that turns a
//! single momentary relay, two position sensors, local and remote buttons,
//! and a close warning buzzer into one authoritative [`DoorState`] with an
//! estimated position.
//!
//! # Overview
//!
//! The opener behind the relay cycles through a fixed sequence every time
//! it is pulsed: open, stop, close, stop, open ... The controller tracks
//! where in that sequence the door is and pulses the relay as many times
//! as needed to reach a requested [`TargetState`].
//!
//! An automated close (hub request, lock request) always plays the warning
//! tune first. A button press is assumed attended and closes straight away.
//!
//! # Tick order
//!
//! [`GarageDoor::tick`] does the following, stopping at the first step that
//! changes the state:
//!
//! 1. Hold the relay for its pulse width, then release it.
//! 2. Closed sensor confirmed → `Closed` (or `Locked` if a lock is pending).
//! 3. Open sensor confirmed → `Open`.
//! 4. Dead-reckon the position, detect timeouts and position targets.
//! 5. Local ladder and remote button edges.
//! 6. Drive the pending target.
//!
//! # Example
//!
//! ```rust
//! use rs_garage::{Config, DoorController, DoorState, GarageDoor};
//! use rs_garage::hal::{MockDoorHardware, MockSink};
//!
//! let mut door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
//! door.setup(0, false).unwrap();
//!
//! // Hub asks for open: recorded, then driven by tick()
//! door.control(false, Some(1.0)).unwrap();
//! door.tick(10).unwrap();
//! assert_eq!(door.state(), DoorState::Opening);
//! assert_eq!(door.hardware().pulse_count, 1);
//!
//! // The open sensor confirms arrival once the settle delay has passed
//! door.hardware_mut().closed = false;
//! door.hardware_mut().open = true;
//! door.tick(9_000).unwrap();
//! assert_eq!(door.state(), DoorState::Open);
//! assert_eq!(door.position(), 1.0);
//! ```

use log::{debug, info, warn};

use crate::buttons::{EdgeDetector, LocalButton, LocalButtonReader};
use crate::commands::{CommandOutcome, DoorCommand, IgnoreReason};
use crate::config::Config;
use crate::door::{DoorSnapshot, DoorState, TargetState};
use crate::events::{DoorEvent, Travel};
use crate::position::{PositionEstimator, TravelDirection};
use crate::traits::{DoorHardware, DoorSink};

// ============================================================================
// Controller trait
// ============================================================================

/// Command surface a host exposes for the door.
///
/// Mirrors a generic cover entity (`control`) plus a lock entity
/// (`lock`/`unlock`). Implemented by [`GarageDoor`]; hosts that share the
/// door across threads implement it on their wrapper.
pub trait DoorController {
    /// Error type for hardware access during a command.
    type Error;

    /// Ask the door to reach `target`.
    fn request(&mut self, target: TargetState) -> Result<CommandOutcome, Self::Error>;

    /// Lock the door, closing it first if needed.
    fn lock(&mut self) -> Result<CommandOutcome, Self::Error>;

    /// Unlock a locked door.
    fn unlock(&mut self) -> Result<CommandOutcome, Self::Error>;

    /// Current state snapshot.
    fn snapshot(&self) -> DoorSnapshot;

    /// Cover control call: `stop` wins over `position`.
    fn control(&mut self, stop: bool, position: Option<f32>) -> Result<CommandOutcome, Self::Error> {
        if stop {
            self.request(TargetState::Stopped)
        } else if let Some(position) = position {
            self.request(TargetState::Position(position))
        } else {
            Ok(CommandOutcome::Ignored(IgnoreReason::NothingRequested))
        }
    }

    /// Apply a [`DoorCommand`].
    fn apply(&mut self, command: DoorCommand) -> Result<CommandOutcome, Self::Error> {
        match command {
            DoorCommand::Lock => self.lock(),
            DoorCommand::Unlock => self.unlock(),
            DoorCommand::Open => self.request(TargetState::Open),
            DoorCommand::Close => self.request(TargetState::Closed),
            DoorCommand::Stop => self.request(TargetState::Stopped),
            DoorCommand::SetPosition(p) => self.request(TargetState::Position(p)),
        }
    }
}

// ============================================================================
// Relay pulse tracking
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
struct RelayPulse {
    activated_ms: Option<u64>,
    released_ms: Option<u64>,
}

impl RelayPulse {
    fn is_active(&self) -> bool {
        self.activated_ms.is_some()
    }

    fn is_ready(&self, now_ms: u64, inactive_ms: u32) -> bool {
        self.activated_ms.is_none()
            && self
                .released_ms
                .map_or(true, |r| now_ms.saturating_sub(r) >= inactive_ms as u64)
    }
}

// ============================================================================
// Garage door
// ============================================================================

/// Garage door controller.
///
/// # Type Parameters
///
/// - `H`: Board hardware ([`DoorHardware`])
/// - `K`: Outbound state and event sink ([`DoorSink`])
///
/// # Thread Safety
///
/// The controller is owned by a single control loop. Commands from other
/// threads go through [`SharedDoor`](crate::services::SharedDoor)
/// (requires the `std` feature).
pub struct GarageDoor<H: DoorHardware, K: DoorSink> {
    config: Config,
    hw: H,
    sink: K,
    state: DoorState,
    target: TargetState,
    estimator: PositionEstimator,
    relay: RelayPulse,
    local_buttons: LocalButtonReader,
    remote_door: EdgeDetector,
    remote_light: EdgeDetector,
    now_ms: u64,
    last_state_change_ms: u64,
    last_publish_ms: u64,
    travel_start: Option<(Travel, u64)>,
    last_open_ms: Option<u64>,
    last_close_ms: Option<u64>,
    warning_from_open: bool,
}

impl<H: DoorHardware, K: DoorSink> GarageDoor<H, K> {
    /// Create a controller. Call [`setup`](Self::setup) before the first tick.
    pub fn new(config: Config, hw: H, sink: K) -> Self {
        let estimator =
            PositionEstimator::new(config.door.open_duration_ms, config.door.close_duration_ms);
        let local_buttons =
            LocalButtonReader::new(config.buttons, config.timing.button_read_interval_ms);
        Self {
            config,
            hw,
            sink,
            state: DoorState::Unknown,
            target: TargetState::None,
            estimator,
            relay: RelayPulse::default(),
            local_buttons,
            remote_door: EdgeDetector::new(),
            remote_light: EdgeDetector::new(),
            now_ms: 0,
            last_state_change_ms: 0,
            last_publish_ms: 0,
            travel_start: None,
            last_open_ms: None,
            last_close_ms: None,
            warning_from_open: false,
        }
    }

    /// Seed the state from the sensors and publish it.
    ///
    /// `restored_lock` is the lock state the host persisted before the last
    /// reset; it only applies if the door is found closed.
    pub fn setup(&mut self, now_ms: u64, restored_lock: bool) -> Result<(), H::Error> {
        self.now_ms = now_ms;
        self.hw.set_relay(false)?;

        let closed = self.hw.closed_sensor()?;
        let open = self.hw.open_sensor()?;
        self.remote_door = EdgeDetector::seeded(self.hw.remote_button()?);
        self.remote_light = EdgeDetector::seeded(self.hw.remote_light_button()?);

        if closed && open {
            warn!("both door sensors active at boot, trusting closed sensor");
        }
        self.state = match (closed, open) {
            (true, _) if restored_lock => DoorState::Locked,
            (true, _) => DoorState::Closed,
            (false, true) => DoorState::Open,
            (false, false) => DoorState::Unknown,
        };
        match self.state {
            DoorState::Open => self.estimator.confirm(1.0),
            DoorState::Unknown => self.estimator.reset_unknown(),
            _ => self.estimator.confirm(0.0),
        }
        self.target = TargetState::None;
        self.last_state_change_ms = now_ms;

        info!("door starting {}", self.state);
        self.publish(now_ms);
        self.sink.publish_lock_state(self.state == DoorState::Locked);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current door state.
    #[inline]
    pub fn state(&self) -> DoorState {
        self.state
    }

    /// Pending target.
    #[inline]
    pub fn target(&self) -> TargetState {
        self.target
    }

    /// Estimated or confirmed position.
    #[inline]
    pub fn position(&self) -> f32 {
        self.estimator.position()
    }

    /// True when locked.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state == DoorState::Locked
    }

    /// True while the relay is held active. Hosts mirror this on a status LED.
    #[inline]
    pub fn relay_active(&self) -> bool {
        self.relay.is_active()
    }

    /// Active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the hardware.
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Mutably borrow the hardware.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Take the hardware and sink back.
    pub fn into_parts(self) -> (H, K) {
        (self.hw, self.sink)
    }

    // ------------------------------------------------------------------------
    // Control loop
    // ------------------------------------------------------------------------

    /// Run one control loop step. Call frequently (every few milliseconds).
    pub fn tick(&mut self, now_ms: u64) -> Result<(), H::Error> {
        self.now_ms = now_ms;
        self.hw.poll_warning()?;

        // 1. Relay pulse width
        if let Some(activated) = self.relay.activated_ms {
            if now_ms.saturating_sub(activated) < self.config.timing.control_pin_active_ms as u64 {
                return Ok(());
            }
            self.hw.set_relay(false)?;
            self.relay = RelayPulse {
                activated_ms: None,
                released_ms: Some(now_ms),
            };
            debug!("relay released");
        }

        // 2 and 3. Terminal sensors
        // Unknown has no motion to settle from
        let settled = self.state == DoorState::Unknown
            || now_ms.saturating_sub(self.last_state_change_ms)
                >= self.config.timing.sensor_read_delay_ms as u64;
        if settled {
            if !self.state.is_closed() && self.hw.closed_sensor()? {
                return self.on_closed_sensor(now_ms);
            }
            if !matches!(self.state, DoorState::Open | DoorState::CloseWarning)
                && self.hw.open_sensor()?
            {
                return self.on_open_sensor(now_ms);
            }
        }

        // 4. Dead reckoning
        if self.update_motion(now_ms)? {
            return Ok(());
        }

        if !self
            .relay
            .is_ready(now_ms, self.config.timing.control_pin_inactive_ms)
        {
            return Ok(());
        }

        // 5. Buttons
        if self.check_buttons(now_ms)? {
            return Ok(());
        }

        // 6. Target
        self.resolve_target(now_ms)
    }

    fn on_closed_sensor(&mut self, now_ms: u64) -> Result<(), H::Error> {
        let failed = self.state == DoorState::Opening;
        if failed {
            warn!("closed sensor active while opening");
            self.sink.fire_event(DoorEvent::OpenFailed);
        }
        let next = if self.target == TargetState::Locked {
            DoorState::Locked
        } else {
            DoorState::Closed
        };
        let satisfied = match self.target {
            TargetState::Closed | TargetState::Locked | TargetState::Stopped => true,
            TargetState::Position(p) => p <= self.config.door.position_tolerance,
            _ => false,
        };
        if failed || satisfied {
            self.target = TargetState::None;
        }
        if self.state == DoorState::CloseWarning {
            self.hw.stop_warning()?;
        }
        self.set_state(next, now_ms);
        Ok(())
    }

    fn on_open_sensor(&mut self, now_ms: u64) -> Result<(), H::Error> {
        let failed = self.state == DoorState::Closing;
        if failed {
            warn!("open sensor active while closing");
            self.sink.fire_event(DoorEvent::CloseFailed);
        }
        let satisfied = match self.target {
            TargetState::Open | TargetState::Stopped => true,
            TargetState::Position(p) => p >= 1.0 - self.config.door.position_tolerance,
            _ => false,
        };
        if failed || satisfied {
            self.target = TargetState::None;
        }
        self.set_state(DoorState::Open, now_ms);
        Ok(())
    }

    /// Returns true if the state changed.
    fn update_motion(&mut self, now_ms: u64) -> Result<bool, H::Error> {
        let elapsed = now_ms.saturating_sub(self.last_state_change_ms);
        let travel_ms = match self.state {
            DoorState::Opening => self.config.door.open_duration_ms,
            DoorState::Closing => self.config.door.close_duration_ms,
            DoorState::Moving => self.config.door.max_duration_ms(),
            _ => {
                self.publish_if_due(now_ms);
                return Ok(false);
            }
        };

        if elapsed > travel_ms as u64 * 2 {
            warn!(
                "door {} for {}ms without reaching a sensor, position unknown",
                self.state, elapsed
            );
            self.target = TargetState::None;
            self.set_state(DoorState::Unknown, now_ms);
            return Ok(true);
        }

        if self.state == DoorState::Moving {
            self.publish_if_due(now_ms);
            return Ok(false);
        }

        let before = self.estimator.position();
        self.estimator.update(now_ms);
        if let TargetState::Position(p) = self.target {
            let tolerance = self.config.door.position_tolerance;
            // A target behind the direction of travel is handled in step 6
            let ahead = match self.state {
                DoorState::Opening => p + tolerance >= before,
                _ => p - tolerance <= before,
            };
            if ahead
                && self.estimator.has_reached(p, tolerance)
                && self.advance(false, now_ms)?
            {
                debug!("reached position {:.2}", p);
                self.target = TargetState::None;
                return Ok(true);
            }
        }
        self.publish_if_due(now_ms);
        Ok(false)
    }

    /// Returns true if a button changed the state.
    fn check_buttons(&mut self, now_ms: u64) -> Result<bool, H::Error> {
        let hw = &mut self.hw;
        let local = self
            .local_buttons
            .try_poll(now_ms, || hw.read_button_ladder())?;
        if let Some(button) = local {
            debug!("local button {}", button.as_str());
            match button {
                LocalButton::Door => return self.button_press(now_ms),
                LocalButton::Lock => {
                    if self.state == DoorState::Locked {
                        self.unlock()?;
                        return Ok(true);
                    }
                    if self.target == TargetState::Locked {
                        debug!("pending lock cancelled");
                        self.target = TargetState::None;
                        return Ok(false);
                    }
                    self.target = TargetState::None;
                    return Ok(self.lock()? == CommandOutcome::Applied);
                }
                LocalButton::Light => self.sink.fire_event(DoorEvent::LocalLightButton),
                LocalButton::Disconnected => {
                    warn!("local button ladder disconnected");
                    self.sink.fire_event(DoorEvent::ButtonDisconnected);
                }
                LocalButton::None => {}
            }
        }

        let remote = self.hw.remote_button()?;
        if self.remote_door.rising(remote) {
            if self.state == DoorState::Locked {
                debug!("remote button ignored while locked");
            } else {
                debug!("remote door button");
                return self.button_press(now_ms);
            }
        }

        let remote_light = self.hw.remote_light_button()?;
        if self.remote_light.rising(remote_light) {
            self.sink.fire_event(DoorEvent::RemoteLightButton);
        }
        Ok(false)
    }

    fn button_press(&mut self, now_ms: u64) -> Result<bool, H::Error> {
        self.target = TargetState::None;
        self.advance(true, now_ms)
    }

    fn resolve_target(&mut self, now_ms: u64) -> Result<(), H::Error> {
        if self.state == DoorState::CloseWarning {
            if !self.hw.warning_playing() {
                self.advance(false, now_ms)?;
            }
            return Ok(());
        }

        let state = self.state;
        match self.target {
            TargetState::None => {}
            TargetState::Stopped => {
                if !state.is_moving() || self.advance(false, now_ms)? {
                    self.target = TargetState::None;
                }
            }
            TargetState::Open => match state {
                DoorState::Open => self.target = TargetState::None,
                DoorState::Opening | DoorState::Moving => {}
                _ => {
                    self.advance(false, now_ms)?;
                }
            },
            TargetState::Closed | TargetState::Locked => match state {
                DoorState::Closed if self.target == TargetState::Locked => {
                    self.target = TargetState::None;
                    self.set_state(DoorState::Locked, now_ms);
                }
                DoorState::Closed | DoorState::Locked => self.target = TargetState::None,
                DoorState::Closing | DoorState::Moving => {}
                _ => {
                    self.advance(false, now_ms)?;
                }
            },
            TargetState::Position(p) => {
                let position = self.estimator.position();
                let tolerance = self.config.door.position_tolerance;
                match state {
                    DoorState::Moving => {}
                    DoorState::Opening if p >= position => {}
                    DoorState::Closing if p <= position => {}
                    _ if state.is_idle() && (position - p).abs() <= tolerance => {
                        self.target = TargetState::None;
                    }
                    _ => {
                        self.advance(false, now_ms)?;
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Take the next step of the opener sequence.
    ///
    /// Returns false if the step needs a relay pulse and the relay is not
    /// ready yet.
    fn advance(&mut self, from_button: bool, now_ms: u64) -> Result<bool, H::Error> {
        let (next, pulse) = match (self.state, from_button) {
            (DoorState::Unknown, _) => (DoorState::Moving, true),
            (DoorState::Moving, _) => (DoorState::Unknown, true),
            (DoorState::Locked | DoorState::Closed, _) => (DoorState::Opening, true),
            (DoorState::Opening, _) => (DoorState::StoppedOpening, true),
            (DoorState::StoppedOpening | DoorState::Open, true) => (DoorState::Closing, true),
            (DoorState::StoppedOpening | DoorState::Open, false) => {
                (DoorState::CloseWarning, false)
            }
            (DoorState::CloseWarning, true) => (self.warning_abort_state()?, false),
            (DoorState::CloseWarning, false) => (DoorState::Closing, true),
            (DoorState::Closing, _) => (DoorState::StoppedClosing, true),
            (DoorState::StoppedClosing, _) => (DoorState::Opening, true),
        };

        if pulse {
            if !self
                .relay
                .is_ready(now_ms, self.config.timing.control_pin_inactive_ms)
            {
                return Ok(false);
            }
            self.hw.set_relay(true)?;
            self.relay.activated_ms = Some(now_ms);
            debug!("relay pulse ({} -> {})", self.state, next);
        }

        if self.state == DoorState::CloseWarning {
            self.hw.stop_warning()?;
        }
        if next == DoorState::CloseWarning {
            self.hw.play_warning(&self.config.device.warning_tune)?;
        }
        self.set_state(next, now_ms);
        Ok(true)
    }

    /// Where an aborted close warning leaves the door. Only the open
    /// sensor, or a warning that started at the open end, makes it `Open`.
    fn warning_abort_state(&mut self) -> Result<DoorState, H::Error> {
        if self.warning_from_open || self.hw.open_sensor()? {
            Ok(DoorState::Open)
        } else {
            Ok(DoorState::StoppedOpening)
        }
    }

    fn set_state(&mut self, next: DoorState, now_ms: u64) {
        let prev = self.state;
        if prev == next {
            return;
        }
        info!("door {} -> {}", prev, next);

        let from_closed_end = self.estimator.position() <= 0.0;
        let from_open_end = self.estimator.position() >= 1.0;

        self.state = next;
        self.last_state_change_ms = now_ms;
        if next == DoorState::CloseWarning {
            self.warning_from_open = prev == DoorState::Open;
        }

        match next {
            DoorState::Unknown | DoorState::Moving => self.estimator.reset_unknown(),
            DoorState::Closed | DoorState::Locked => self.estimator.confirm(0.0),
            DoorState::Open => self.estimator.confirm(1.0),
            DoorState::Opening => self.estimator.start(TravelDirection::Opening, now_ms),
            DoorState::Closing => self.estimator.start(TravelDirection::Closing, now_ms),
            DoorState::StoppedOpening | DoorState::StoppedClosing | DoorState::CloseWarning => {
                self.estimator.update(now_ms);
                self.estimator.halt();
            }
        }

        match next {
            DoorState::Opening => {
                self.travel_start = from_closed_end.then_some((Travel::Open, now_ms));
            }
            DoorState::Closing => {
                self.travel_start = from_open_end.then_some((Travel::Close, now_ms));
            }
            DoorState::Open => self.finish_travel(Travel::Open, now_ms),
            DoorState::Closed | DoorState::Locked if !prev.is_closed() => {
                self.finish_travel(Travel::Close, now_ms)
            }
            DoorState::Closed | DoorState::Locked => {}
            _ => self.travel_start = None,
        }

        if prev == DoorState::Locked || next == DoorState::Locked {
            self.sink.publish_lock_state(next == DoorState::Locked);
        }
        self.publish(now_ms);
    }

    fn finish_travel(&mut self, arrived: Travel, now_ms: u64) {
        if let Some((travel, started)) = self.travel_start.take() {
            if travel == arrived {
                let duration = now_ms.saturating_sub(started);
                info!("{} took {}ms", travel.as_str(), duration);
                match travel {
                    Travel::Open => self.last_open_ms = Some(duration),
                    Travel::Close => self.last_close_ms = Some(duration),
                }
                self.sink.publish_travel_time(travel, duration);
            }
        }
    }

    fn publish(&mut self, now_ms: u64) {
        self.sink
            .publish_door_state(self.estimator.position(), self.state.operation());
        self.last_publish_ms = now_ms;
    }

    fn publish_if_due(&mut self, now_ms: u64) {
        if self.state.operation() == crate::door::CoverOperation::Idle {
            return;
        }
        if now_ms.saturating_sub(self.last_publish_ms)
            >= self.config.timing.publish_interval_ms as u64
        {
            self.publish(now_ms);
        }
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    fn normalize(&self, target: TargetState) -> Option<TargetState> {
        match target {
            TargetState::Position(p) if !p.is_finite() => None,
            TargetState::Position(p) if p <= 0.0 => Some(TargetState::Closed),
            TargetState::Position(p) if p >= 1.0 => Some(TargetState::Open),
            other => Some(other),
        }
    }

    /// Cancel a running close warning. Returns true if one was running.
    fn cancel_warning(&mut self) -> Result<bool, H::Error> {
        if self.state != DoorState::CloseWarning {
            return Ok(false);
        }
        info!("close warning cancelled");
        self.hw.stop_warning()?;
        self.target = TargetState::None;
        let resolved = self.warning_abort_state()?;
        self.set_state(resolved, self.now_ms);
        Ok(true)
    }

    /// Build a state snapshot.
    pub fn snapshot(&self) -> DoorSnapshot {
        DoorSnapshot {
            state: self.state,
            target: self.target,
            position: self.estimator.position(),
            operation: self.state.operation(),
            locked: self.is_locked(),
            relay_active: self.relay.is_active(),
            last_open_ms: self.last_open_ms,
            last_close_ms: self.last_close_ms,
        }
    }
}

impl<H: DoorHardware, K: DoorSink> DoorController for GarageDoor<H, K> {
    type Error = H::Error;

    /// Record a target. Immediate changes are stamped with the last tick time.
    fn request(&mut self, target: TargetState) -> Result<CommandOutcome, H::Error> {
        let Some(target) = self.normalize(target) else {
            return Ok(CommandOutcome::Ignored(IgnoreReason::InvalidPosition));
        };
        match target {
            TargetState::None => return Ok(CommandOutcome::Ignored(IgnoreReason::NothingRequested)),
            TargetState::Locked => return self.lock(),
            _ => {}
        }

        let cancelled = self.cancel_warning()?;
        let position = self.estimator.position();
        let tolerance = self.config.door.position_tolerance;
        let already_there = match target {
            TargetState::Closed => self.state.is_closed(),
            TargetState::Open => self.state == DoorState::Open,
            TargetState::Position(p) => self.state.is_idle() && (position - p).abs() <= tolerance,
            TargetState::Stopped => !self.state.is_moving(),
            TargetState::None | TargetState::Locked => false,
        };

        if already_there {
            let had_pending = !self.target.is_none();
            self.target = TargetState::None;
            if cancelled || had_pending {
                return Ok(CommandOutcome::Applied);
            }
            let reason = if target == TargetState::Stopped {
                IgnoreReason::NotMoving
            } else {
                IgnoreReason::AlreadyThere
            };
            return Ok(CommandOutcome::Ignored(reason));
        }

        debug!("target {}", target.as_str());
        self.target = target;
        Ok(CommandOutcome::Accepted)
    }

    fn lock(&mut self) -> Result<CommandOutcome, H::Error> {
        match self.state {
            DoorState::Locked => Ok(CommandOutcome::Ignored(IgnoreReason::AlreadyThere)),
            DoorState::Closed => {
                self.target = TargetState::None;
                self.set_state(DoorState::Locked, self.now_ms);
                Ok(CommandOutcome::Applied)
            }
            _ => {
                debug!("lock pending until closed");
                self.target = TargetState::Locked;
                Ok(CommandOutcome::Accepted)
            }
        }
    }

    fn unlock(&mut self) -> Result<CommandOutcome, H::Error> {
        if self.state == DoorState::Locked {
            self.set_state(DoorState::Closed, self.now_ms);
            return Ok(CommandOutcome::Applied);
        }
        if self.target == TargetState::Locked {
            self.target = TargetState::Closed;
            return Ok(CommandOutcome::Applied);
        }
        Ok(CommandOutcome::Ignored(IgnoreReason::NotLocked))
    }

    fn snapshot(&self) -> DoorSnapshot {
        GarageDoor::snapshot(self)
    }
}
