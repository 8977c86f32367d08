//! Thread-safe wrapper around a [`GarageDoor`].
//!
//! `SharedDoor` provides locked access to a single controller that can be
//! shared between the control loop and any command sources.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_garage::services::SharedDoor;
//!
//! let shared = Arc::new(SharedDoor::new(door));
//!
//! // Control loop
//! loop {
//!     shared.tick()?;
//!     if let Some(snapshot) = shared.check_changes() {
//!         // Report snapshot to the hub
//!     }
//! }
//!
//! // Command thread
//! shared.with_door(|door| door.lock())?;
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::commands::CommandOutcome;
use crate::controller::{DoorController, GarageDoor};
use crate::door::{DoorSnapshot, DoorState, TargetState};
use crate::traits::{DoorHardware, DoorSink};

// ============================================================================
// Change Detection
// ============================================================================

/// Last reported values, for publishing only on change.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeDetection {
    /// Last reported state
    pub last_state: DoorState,
    /// Last reported position
    pub last_position: f32,
    /// Last reported lock state
    pub last_locked: bool,
}

impl Default for ChangeDetection {
    fn default() -> Self {
        Self {
            last_state: DoorState::Unknown,
            last_position: 0.5,
            last_locked: false,
        }
    }
}

// ============================================================================
// Shared Door
// ============================================================================

/// Shared controller for a threaded host.
///
/// # Thread Safety
///
/// - Uses `Mutex` for controller access because the tick loop writes every
///   few milliseconds.
/// - Change detection has a separate lock.
/// - All timestamps come from the same `start_time`.
/// - A poisoned lock is recovered rather than propagated; the controller
///   state is always consistent between calls.
pub struct SharedDoor<H: DoorHardware, K: DoorSink> {
    door: Mutex<GarageDoor<H, K>>,
    start_time: Instant,
    change_detection: Mutex<ChangeDetection>,
}

impl<H: DoorHardware, K: DoorSink> SharedDoor<H, K> {
    /// Wrap a controller. `start_time` becomes the time base for ticks.
    pub fn new(door: GarageDoor<H, K>) -> Self {
        Self {
            door: Mutex::new(door),
            start_time: Instant::now(),
            change_detection: Mutex::new(ChangeDetection::default()),
        }
    }

    /// Milliseconds since creation.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// The instant ticks count from.
    #[inline]
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    fn lock_door(&self) -> MutexGuard<'_, GarageDoor<H, K>> {
        self.door.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure with exclusive access to the controller.
    pub fn with_door<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut GarageDoor<H, K>) -> R,
    {
        let mut guard = self.lock_door();
        f(&mut guard)
    }

    /// Seed the controller from its sensors.
    pub fn setup(&self, restored_lock: bool) -> Result<(), H::Error> {
        let now_ms = self.now_ms();
        let result = self.with_door(|door| door.setup(now_ms, restored_lock));
        self.sync_change_detection();
        result
    }

    /// Run one control loop step at the current time.
    pub fn tick(&self) -> Result<(), H::Error> {
        let now_ms = self.now_ms();
        self.with_door(|door| door.tick(now_ms))
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> DoorSnapshot {
        self.lock_door().snapshot()
    }

    /// Returns the snapshot if state, lock or position moved since the last call.
    pub fn check_changes(&self) -> Option<DoorSnapshot> {
        let snapshot = self.snapshot();

        let mut detection = self
            .change_detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let changed = snapshot.state != detection.last_state
            || snapshot.locked != detection.last_locked
            || (snapshot.position - detection.last_position).abs() > 0.001;

        if changed {
            detection.last_state = snapshot.state;
            detection.last_position = snapshot.position;
            detection.last_locked = snapshot.locked;
            Some(snapshot)
        } else {
            None
        }
    }

    /// Take the current state as the change detection baseline.
    pub fn sync_change_detection(&self) {
        let snapshot = self.snapshot();
        let mut detection = self
            .change_detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        detection.last_state = snapshot.state;
        detection.last_position = snapshot.position;
        detection.last_locked = snapshot.locked;
    }

    /// Current change detection baseline.
    pub fn change_detection_state(&self) -> ChangeDetection {
        self.change_detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

// ============================================================================
// DoorController for Arc<SharedDoor>
// ============================================================================

impl<H: DoorHardware, K: DoorSink> DoorController for Arc<SharedDoor<H, K>> {
    type Error = H::Error;

    fn request(&mut self, target: TargetState) -> Result<CommandOutcome, H::Error> {
        self.with_door(|door| door.request(target))
    }

    fn lock(&mut self) -> Result<CommandOutcome, H::Error> {
        self.with_door(|door| door.lock())
    }

    fn unlock(&mut self) -> Result<CommandOutcome, H::Error> {
        self.with_door(|door| door.unlock())
    }

    fn snapshot(&self) -> DoorSnapshot {
        SharedDoor::snapshot(self)
    }
}
