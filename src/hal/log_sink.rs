//! A [`DoorSink`] that writes everything to the `log` facade.
//!
//! Used by the simulator and as the fallback sink on boards without a hub
//! connection. Events are logged under their qualified hub name.

use log::{debug, info, warn};

use crate::config::ShortString;
use crate::door::CoverOperation;
use crate::events::{DoorEvent, Travel};
use crate::traits::DoorSink;

/// Logging sink.
///
/// # Example
///
/// ```rust
/// use rs_garage::hal::LogSink;
/// use rs_garage::traits::DoorSink;
/// use rs_garage::events::DoorEvent;
///
/// let mut sink = LogSink::new("garage_door");
/// sink.fire_event(DoorEvent::OpenFailed);
/// assert_eq!(sink.events_fired(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LogSink {
    object_id: ShortString,
    events_fired: u32,
    last_operation: Option<CoverOperation>,
}

impl LogSink {
    /// Create a sink for the door with the given object id.
    pub fn new(object_id: &str) -> Self {
        Self {
            object_id: crate::config::short_string(object_id),
            events_fired: 0,
            last_operation: None,
        }
    }

    /// Number of events fired so far.
    pub fn events_fired(&self) -> u32 {
        self.events_fired
    }
}

impl DoorSink for LogSink {
    fn publish_door_state(&mut self, position: f32, operation: CoverOperation) {
        // Repeated progress publishes while moving
        if self.last_operation == Some(operation) && operation != CoverOperation::Idle {
            debug!("{}: {} at {:.0}%", self.object_id, operation.as_str(), position * 100.0);
        } else {
            info!("{}: {} at {:.0}%", self.object_id, operation.as_str(), position * 100.0);
        }
        self.last_operation = Some(operation);
    }

    fn publish_lock_state(&mut self, locked: bool) {
        info!(
            "{}: {}",
            self.object_id,
            if locked { "locked" } else { "unlocked" }
        );
    }

    fn fire_event(&mut self, event: DoorEvent) {
        self.events_fired += 1;
        let name = event.qualified_name(&self.object_id);
        if event.is_failure() {
            warn!("event {}", name);
        } else {
            info!("event {}", name);
        }
    }

    fn publish_travel_time(&mut self, travel: Travel, duration_ms: u64) {
        info!(
            "{}: {} {:.1}s",
            self.object_id,
            travel.as_str(),
            duration_ms as f32 / 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_events() {
        let mut sink = LogSink::new("shop");
        sink.fire_event(DoorEvent::RemoteLightButton);
        sink.fire_event(DoorEvent::CloseFailed);
        sink.publish_door_state(0.5, CoverOperation::Opening);
        sink.publish_lock_state(false);
        assert_eq!(sink.events_fired(), 2);
    }
}
