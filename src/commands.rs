//! Command types for the door controller.
//!
//! Hosts talk to the controller through the cover/lock surface of
//! [`DoorController`]: `control(stop, position)`, `lock()` and `unlock()`.
//! [`DoorCommand`] is the same vocabulary as a single value, convenient for
//! queues and for text payloads:
//!
//! ```rust
//! use rs_garage::DoorCommand;
//!
//! assert_eq!("open".parse(), Ok(DoorCommand::Open));
//! assert_eq!("CLOSE".parse(), Ok(DoorCommand::Close));
//! assert_eq!("40%".parse(), Ok(DoorCommand::SetPosition(0.4)));
//! ```
//!
//! # Command Outcomes
//!
//! Every command returns a [`CommandOutcome`]:
//!
//! - [`CommandOutcome::Applied`]: the state changed immediately (lock, unlock)
//! - [`CommandOutcome::Accepted`]: a target was recorded and will be driven by `tick`
//! - [`CommandOutcome::Ignored`]: nothing to do, see [`IgnoreReason`]
//!
//! [`DoorController`]: crate::DoorController

use core::str::FromStr;

use crate::door::TargetState;
use crate::error::ParseCommandError;

// ============================================================================
// Commands
// ============================================================================

/// A single door command.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DoorCommand {
    /// Fully open.
    Open,
    /// Fully close (through the close warning).
    Close,
    /// Stop any motion.
    Stop,
    /// Move to a position between 0.0 (closed) and 1.0 (open).
    SetPosition(f32),
    /// Close if needed, then lock.
    Lock,
    /// Unlock a locked door.
    Unlock,
}

impl DoorCommand {
    /// Returns the command name as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DoorCommand::Open => "open",
            DoorCommand::Close => "close",
            DoorCommand::Stop => "stop",
            DoorCommand::SetPosition(_) => "set_position",
            DoorCommand::Lock => "lock",
            DoorCommand::Unlock => "unlock",
        }
    }

    /// Parse a command from text input.
    ///
    /// Supports:
    /// - Keywords: `"open"`, `"close"`/`"closed"`, `"stop"`, `"lock"`, `"unlock"`
    /// - Fractions: `"0.25"` (0.0 to 1.0)
    /// - Percentages: `"25%"` (0 to 100)
    ///
    /// Input is trimmed and case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_garage::DoorCommand;
    /// use rs_garage::error::ParseCommandError;
    ///
    /// assert_eq!(DoorCommand::from_text(" Stop "), Ok(DoorCommand::Stop));
    /// assert_eq!(DoorCommand::from_text("0.5"), Ok(DoorCommand::SetPosition(0.5)));
    /// assert_eq!(DoorCommand::from_text("1.5"), Err(ParseCommandError::OutOfRange));
    /// assert_eq!(DoorCommand::from_text("wiggle"), Err(ParseCommandError::Unrecognized));
    /// ```
    pub fn from_text(s: &str) -> Result<Self, ParseCommandError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseCommandError::Empty);
        }
        let keyword = if s.eq_ignore_ascii_case("open") {
            Some(DoorCommand::Open)
        } else if s.eq_ignore_ascii_case("close") || s.eq_ignore_ascii_case("closed") {
            Some(DoorCommand::Close)
        } else if s.eq_ignore_ascii_case("stop") {
            Some(DoorCommand::Stop)
        } else if s.eq_ignore_ascii_case("lock") {
            Some(DoorCommand::Lock)
        } else if s.eq_ignore_ascii_case("unlock") {
            Some(DoorCommand::Unlock)
        } else {
            None
        };
        if let Some(cmd) = keyword {
            return Ok(cmd);
        }

        let (number, scale) = match s.strip_suffix('%') {
            Some(pct) => (pct.trim(), 100.0),
            None => (s, 1.0),
        };
        let value: f32 = number
            .parse()
            .map_err(|_| ParseCommandError::Unrecognized)?;
        let position = value / scale;
        if !position.is_finite() || !(0.0..=1.0).contains(&position) {
            return Err(ParseCommandError::OutOfRange);
        }
        Ok(DoorCommand::SetPosition(position))
    }

    /// The target this command asks for, if it is a cover command.
    ///
    /// Returns `None` for [`Unlock`](Self::Unlock), which is not a target.
    pub fn target(&self) -> Option<TargetState> {
        match *self {
            DoorCommand::Open => Some(TargetState::Open),
            DoorCommand::Close => Some(TargetState::Closed),
            DoorCommand::Stop => Some(TargetState::Stopped),
            DoorCommand::SetPosition(p) => Some(TargetState::Position(p)),
            DoorCommand::Lock => Some(TargetState::Locked),
            DoorCommand::Unlock => None,
        }
    }
}

impl FromStr for DoorCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DoorCommand::from_text(s)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Result of a door command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CommandOutcome {
    /// The door state changed immediately, without a relay pulse.
    Applied,
    /// A target was recorded; `tick` will drive the door towards it.
    Accepted,
    /// The command had nothing to do.
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    /// True unless the command was ignored.
    pub const fn is_effective(&self) -> bool {
        !matches!(self, CommandOutcome::Ignored(_))
    }
}

/// Why a command was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IgnoreReason {
    /// The door is idle and already where the command asks.
    AlreadyThere,
    /// Stop requested while nothing is moving.
    NotMoving,
    /// Unlock requested while the door is not locked.
    NotLocked,
    /// Position was NaN or infinite.
    InvalidPosition,
    /// A control call with neither stop nor a position.
    NothingRequested,
}

impl IgnoreReason {
    /// Returns the reason as a `snake_case` string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::AlreadyThere => "already_there",
            IgnoreReason::NotMoving => "not_moving",
            IgnoreReason::NotLocked => "not_locked",
            IgnoreReason::InvalidPosition => "invalid_position",
            IgnoreReason::NothingRequested => "nothing_requested",
        }
    }
}
