//! Desktop clock backed by `std::time::Instant`.

use std::time::Instant;

use crate::traits::Clock;

/// Monotonic clock counting from its creation.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    start: Instant,
}

impl StdClock {
    /// Start a clock at 0ms.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// The instant this clock counts from.
    pub fn start_time(&self) -> Instant {
        self.start
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
