//! Outbound state and event sink.
//!
//! The controller reports everything it decides through a [`DoorSink`]:
//! cover state (position plus operation), lock state, named events, and
//! measured travel times. How those reach a hub is up to the host.

use crate::door::CoverOperation;
use crate::events::{DoorEvent, Travel};

/// Receiver for door state publishes and events.
///
/// Publishing is fire-and-forget; a sink that can fail should queue or
/// log internally rather than stall the control loop.
///
/// # Example Implementation
///
/// ```rust
/// use rs_garage::door::CoverOperation;
/// use rs_garage::events::DoorEvent;
/// use rs_garage::traits::DoorSink;
///
/// #[derive(Default)]
/// struct Counter {
///     publishes: usize,
///     failures: usize,
/// }
///
/// impl DoorSink for Counter {
///     fn publish_door_state(&mut self, _position: f32, _operation: CoverOperation) {
///         self.publishes += 1;
///     }
///
///     fn publish_lock_state(&mut self, _locked: bool) {}
///
///     fn fire_event(&mut self, event: DoorEvent) {
///         if event.is_failure() {
///             self.failures += 1;
///         }
///     }
/// }
/// ```
pub trait DoorSink {
    /// Publish the cover state.
    fn publish_door_state(&mut self, position: f32, operation: CoverOperation);

    /// Publish the lock state.
    fn publish_lock_state(&mut self, locked: bool);

    /// Fire a named event.
    fn fire_event(&mut self, event: DoorEvent);

    /// Publish a measured full travel time.
    ///
    /// Default implementation discards it.
    fn publish_travel_time(&mut self, _travel: Travel, _duration_ms: u64) {}
}

impl<S: DoorSink + ?Sized> DoorSink for &mut S {
    fn publish_door_state(&mut self, position: f32, operation: CoverOperation) {
        (**self).publish_door_state(position, operation)
    }

    fn publish_lock_state(&mut self, locked: bool) {
        (**self).publish_lock_state(locked)
    }

    fn fire_event(&mut self, event: DoorEvent) {
        (**self).fire_event(event)
    }

    fn publish_travel_time(&mut self, travel: Travel, duration_ms: u64) {
        (**self).publish_travel_time(travel, duration_ms)
    }
}
