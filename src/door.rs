//! Door, target, and cover operation types.
//!
//! [`DoorState`] is the single authoritative state of the door. It is only
//! ever changed by the controller in response to a sensor, a relay pulse, or
//! an explicit lock/unlock/stop/position request. [`TargetState`] records
//! what a caller asked for and is cleared once reached or superseded.
//!
//! # Example
//!
//! ```rust
//! use rs_garage::door::{CoverOperation, DoorState};
//!
//! assert_eq!(DoorState::CloseWarning.as_str(), "close_warning");
//! assert_eq!(DoorState::CloseWarning.operation(), CoverOperation::Closing);
//! assert!(DoorState::Locked.is_closed());
//! ```

/// Internal door state.
///
/// A single relay toggles the opener through a fixed physical sequence
/// (open, stop, close, stop, open ...). The states mirror that sequence,
/// plus [`Locked`](Self::Locked) and the pre-close [`CloseWarning`](Self::CloseWarning).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorState {
    /// No sensor has confirmed a position since boot or since a timeout.
    #[default]
    Unknown,
    /// Pulsed from `Unknown`; the direction of travel is not known.
    Moving,
    /// Closed, with the remote door button disabled.
    Locked,
    /// Confirmed closed by the closed sensor.
    Closed,
    /// Travelling towards open.
    Opening,
    /// Stopped part way while opening.
    StoppedOpening,
    /// Confirmed open by the open sensor.
    Open,
    /// Playing the close warning tune before an automated close.
    CloseWarning,
    /// Travelling towards closed.
    Closing,
    /// Stopped part way while closing.
    StoppedClosing,
}

impl DoorState {
    /// Returns the state name as a `snake_case` string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DoorState::Unknown => "unknown",
            DoorState::Moving => "moving",
            DoorState::Locked => "locked",
            DoorState::Closed => "closed",
            DoorState::Opening => "opening",
            DoorState::StoppedOpening => "stopped_opening",
            DoorState::Open => "open",
            DoorState::CloseWarning => "close_warning",
            DoorState::Closing => "closing",
            DoorState::StoppedClosing => "stopped_closing",
        }
    }

    /// The cover operation reported to the hub for this state.
    pub const fn operation(&self) -> CoverOperation {
        match self {
            DoorState::Opening => CoverOperation::Opening,
            DoorState::Closing | DoorState::CloseWarning => CoverOperation::Closing,
            DoorState::Moving => CoverOperation::SetPosition,
            _ => CoverOperation::Idle,
        }
    }

    /// True for `Closed` and `Locked`.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        matches!(self, DoorState::Closed | DoorState::Locked)
    }

    /// True while the motor is expected to be running.
    #[inline]
    pub const fn is_moving(&self) -> bool {
        matches!(
            self,
            DoorState::Opening | DoorState::Closing | DoorState::Moving
        )
    }

    /// True when the door is at rest and its position is meaningful.
    #[inline]
    pub const fn is_idle(&self) -> bool {
        matches!(
            self,
            DoorState::Locked
                | DoorState::Closed
                | DoorState::Open
                | DoorState::StoppedOpening
                | DoorState::StoppedClosing
        )
    }
}

impl core::fmt::Display for DoorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome a caller has asked the door to reach.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetState {
    /// Nothing pending.
    #[default]
    None,
    /// Close, then lock.
    Locked,
    /// Fully closed.
    Closed,
    /// Fully open.
    Open,
    /// Stop any motion.
    Stopped,
    /// Partial position between 0.0 (closed) and 1.0 (open).
    Position(f32),
}

impl TargetState {
    /// Returns the target name as a `snake_case` string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TargetState::None => "none",
            TargetState::Locked => "locked",
            TargetState::Closed => "closed",
            TargetState::Open => "open",
            TargetState::Stopped => "stopped",
            TargetState::Position(_) => "position",
        }
    }

    /// True when nothing is pending.
    #[inline]
    pub const fn is_none(&self) -> bool {
        matches!(self, TargetState::None)
    }
}

/// Operation reported alongside the position, as in a generic cover entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoverOperation {
    /// Not moving.
    #[default]
    Idle,
    /// Moving towards open.
    Opening,
    /// Moving (or about to move) towards closed.
    Closing,
    /// Moving in an unknown direction.
    SetPosition,
}

impl CoverOperation {
    /// Returns the operation name as a `snake_case` string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CoverOperation::Idle => "idle",
            CoverOperation::Opening => "opening",
            CoverOperation::Closing => "closing",
            CoverOperation::SetPosition => "set_position",
        }
    }
}

/// Full state snapshot for hosts and UIs.
///
/// # Example
///
/// ```rust
/// use rs_garage::{Config, GarageDoor, DoorState};
/// use rs_garage::hal::{MockDoorHardware, MockSink};
///
/// let mut door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
/// door.setup(0, false).unwrap();
///
/// let snapshot = door.snapshot();
/// assert_eq!(snapshot.state, DoorState::Closed);
/// assert_eq!(snapshot.position, 0.0);
/// assert!(!snapshot.locked);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoorSnapshot {
    /// Current door state.
    pub state: DoorState,
    /// Pending target, if any.
    pub target: TargetState,
    /// Estimated or confirmed position (0.0 closed, 1.0 open).
    pub position: f32,
    /// Operation derived from the state.
    pub operation: CoverOperation,
    /// True when the door is locked.
    pub locked: bool,
    /// True while the relay is held active.
    pub relay_active: bool,
    /// Last measured closed-to-open travel time.
    pub last_open_ms: Option<u64>,
    /// Last measured open-to-closed travel time.
    pub last_close_ms: Option<u64>,
}

impl Default for DoorSnapshot {
    fn default() -> Self {
        Self {
            state: DoorState::Unknown,
            target: TargetState::None,
            position: 0.5,
            operation: CoverOperation::Idle,
            locked: false,
            relay_active: false,
            last_open_ms: None,
            last_close_ms: None,
        }
    }
}
