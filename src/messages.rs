//! Shared message types for host command and state payloads.
//!
//! These types are `no_std` compatible and can be deserialized using either
//! `serde_json` (desktop) or `serde-json-core` (embedded). They mirror the
//! cover and lock entity surface of [`DoorController`].
//!
//! # Example
//!
//! ```
//! use rs_garage::messages::ControlRequest;
//!
//! // Desktop: using serde_json
//! #[cfg(feature = "std")]
//! {
//!     let json = r#"{"position": 0.5}"#;
//!     let req: ControlRequest = serde_json::from_str(json).unwrap();
//!     assert!(!req.stop);
//! }
//!
//! // Embedded: using serde-json-core
//! #[cfg(not(feature = "std"))]
//! {
//!     let json = br#"{"stop": true}"#;
//!     let (req, _): (ControlRequest, _) = serde_json_core::from_slice(json).unwrap();
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::commands::CommandOutcome;
use crate::controller::DoorController;
use crate::door::{CoverOperation, DoorSnapshot, DoorState};

// ============================================================================
// Request Types
// ============================================================================

/// Cover control call.
///
/// # JSON Examples
///
/// Stop:
/// ```json
/// {"stop": true}
/// ```
///
/// Move to 40% open:
/// ```json
/// {"position": 0.4}
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlRequest {
    /// Stop any motion. Wins over `position`.
    #[serde(default)]
    pub stop: bool,
    /// Target position (0.0 closed to 1.0 open).
    #[serde(default)]
    pub position: Option<f32>,
}

impl ControlRequest {
    /// A stop request.
    pub fn stop() -> Self {
        Self {
            stop: true,
            position: None,
        }
    }

    /// A position request.
    pub fn position(position: f32) -> Self {
        Self {
            stop: false,
            position: Some(position),
        }
    }

    /// Hand the request to a controller.
    pub fn apply<D: DoorController>(&self, door: &mut D) -> Result<CommandOutcome, D::Error> {
        door.control(self.stop, self.position)
    }
}

/// Lock entity call.
///
/// # JSON Example
///
/// ```json
/// {"locked": true}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRequest {
    /// Desired lock state
    pub locked: bool,
}

impl LockRequest {
    /// Create a new lock request.
    pub fn new(locked: bool) -> Self {
        Self { locked }
    }

    /// Hand the request to a controller.
    pub fn apply<D: DoorController>(&self, door: &mut D) -> Result<CommandOutcome, D::Error> {
        if self.locked {
            door.lock()
        } else {
            door.unlock()
        }
    }
}

// ============================================================================
// State Message
// ============================================================================

/// Door state as reported to a host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorStateMessage {
    /// Internal state machine state
    pub state: DoorState,
    /// Position (0.0 closed to 1.0 open)
    pub position: f32,
    /// Cover operation
    pub operation: CoverOperation,
    /// Lock entity state
    pub locked: bool,
    /// Last full open travel time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_open_ms: Option<u64>,
    /// Last full close travel time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_close_ms: Option<u64>,
}

impl From<&DoorSnapshot> for DoorStateMessage {
    fn from(snapshot: &DoorSnapshot) -> Self {
        Self {
            state: snapshot.state,
            position: snapshot.position,
            operation: snapshot.operation,
            locked: snapshot.locked,
            last_open_ms: snapshot.last_open_ms,
            last_close_ms: snapshot.last_close_ms,
        }
    }
}

impl DoorStateMessage {
    /// Serialize into `buf`, returning the number of bytes written.
    ///
    /// Returns `None` if `buf` is too small.
    #[cfg(feature = "serde-json-core")]
    pub fn write_json(&self, buf: &mut [u8]) -> Option<usize> {
        serde_json_core::to_slice(self, buf).ok()
    }
}

// ============================================================================
// Parsing Functions (using serde-json-core for no_std compatibility)
// ============================================================================

/// Parse a control request from JSON bytes.
///
/// # Example
///
/// ```
/// use rs_garage::messages::parse_control_request;
///
/// let req = parse_control_request(br#"{"position": 0.25}"#).unwrap();
/// assert_eq!(req.position, Some(0.25));
/// assert!(!req.stop);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_control_request(json: &[u8]) -> Option<ControlRequest> {
    serde_json_core::from_slice(json).ok().map(|(req, _)| req)
}

/// Parse a lock request from JSON bytes.
///
/// # Example
///
/// ```
/// use rs_garage::messages::parse_lock_request;
///
/// let req = parse_lock_request(br#"{"locked": true}"#).unwrap();
/// assert!(req.locked);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_lock_request(json: &[u8]) -> Option<LockRequest> {
    serde_json_core::from_slice(json).ok().map(|(req, _)| req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::controller::GarageDoor;
    use crate::door::TargetState;
    use crate::hal::{MockDoorHardware, MockSink};

    fn closed_door() -> GarageDoor<MockDoorHardware, MockSink> {
        let mut door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
        door.setup(0, false).unwrap();
        door
    }

    // =========================================================================
    // ControlRequest tests
    // =========================================================================

    #[test]
    fn control_request_constructors() {
        assert_eq!(ControlRequest::stop(), ControlRequest { stop: true, position: None });
        assert_eq!(ControlRequest::position(0.3).position, Some(0.3));
    }

    #[test]
    fn control_request_applies_to_door() {
        let mut door = closed_door();
        let outcome = ControlRequest::position(0.6).apply(&mut door).unwrap();
        assert_eq!(outcome, CommandOutcome::Accepted);
        assert_eq!(door.target(), TargetState::Position(0.6));
    }

    #[cfg(feature = "std")]
    #[test]
    fn control_request_serde_defaults() {
        let req: ControlRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, ControlRequest::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn control_request_serde_full() {
        let req: ControlRequest = serde_json::from_str(r#"{"stop": true, "position": 0.2}"#).unwrap();
        assert!(req.stop);
        assert_eq!(req.position, Some(0.2));
    }

    // =========================================================================
    // LockRequest tests
    // =========================================================================

    #[test]
    fn lock_request_round_trip_on_door() {
        let mut door = closed_door();
        assert_eq!(LockRequest::new(true).apply(&mut door).unwrap(), CommandOutcome::Applied);
        assert!(door.is_locked());
        assert_eq!(LockRequest::new(false).apply(&mut door).unwrap(), CommandOutcome::Applied);
        assert!(!door.is_locked());
        assert_eq!(door.hardware().pulse_count, 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn lock_request_requires_field() {
        assert!(serde_json::from_str::<LockRequest>("{}").is_err());
    }

    // =========================================================================
    // DoorStateMessage tests
    // =========================================================================

    #[cfg(feature = "std")]
    #[test]
    fn state_message_serialize() {
        let door = closed_door();
        let msg = DoorStateMessage::from(&door.snapshot());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"state\":\"closed\""));
        assert!(json.contains("\"operation\":\"idle\""));
        assert!(json.contains("\"locked\":false"));
        assert!(!json.contains("last_open_ms"));
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn state_message_write_json() {
        let msg = DoorStateMessage::from(&closed_door().snapshot());
        let mut buf = [0u8; 128];
        let len = msg.write_json(&mut buf).unwrap();
        assert!(core::str::from_utf8(&buf[..len]).unwrap().starts_with("{\"state\":\"closed\""));

        let mut tiny = [0u8; 8];
        assert_eq!(msg.write_json(&mut tiny), None);
    }

    #[cfg(feature = "serde-json-core")]
    #[test]
    fn parse_functions_reject_garbage() {
        assert_eq!(parse_control_request(b"not json"), None);
        assert_eq!(parse_lock_request(br#"{"locked": "yes"}"#), None);
    }
}
