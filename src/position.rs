//! Dead-reckoning position estimator.
//!
//! While no terminal sensor is active the door position is estimated from
//! elapsed time and the configured full-travel duration for the current
//! direction:
//!
//! ```text
//! position += direction * elapsed_ms / travel_ms
//! ```
//!
//! The estimate is clamped to `[MIN_ESTIMATE, MAX_ESTIMATE]`. Exact 0.0 and
//! 1.0 are owned by the sensors and only set through [`PositionEstimator::confirm`].
//!
//! # Example
//!
//! ```rust
//! use rs_garage::position::{PositionEstimator, TravelDirection};
//!
//! let mut est = PositionEstimator::new(10_000, 10_000);
//! est.confirm(0.0);
//! est.start(TravelDirection::Opening, 0);
//!
//! est.update(5_000);
//! // Starts from the 0.01 floor once it leaves the closed sensor
//! assert!((est.position() - 0.51).abs() < 0.001);
//!
//! // Never reaches 1.0 without the open sensor
//! est.update(60_000);
//! assert_eq!(est.position(), 0.99);
//! ```

/// Lowest estimate allowed without the closed sensor.
pub const MIN_ESTIMATE: f32 = 0.01;

/// Highest estimate allowed without the open sensor.
pub const MAX_ESTIMATE: f32 = 0.99;

/// Position used when the door position is not known.
pub const UNKNOWN_POSITION: f32 = 0.5;

/// Direction the estimate is moving in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelDirection {
    /// Position increases.
    Opening,
    /// Position decreases.
    Closing,
}

impl TravelDirection {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            TravelDirection::Opening => 1.0,
            TravelDirection::Closing => -1.0,
        }
    }
}

/// Time-based door position estimator.
#[derive(Clone, Debug)]
pub struct PositionEstimator {
    open_ms: u32,
    close_ms: u32,
    position: f32,
    direction: Option<TravelDirection>,
    last_update_ms: u64,
}

impl PositionEstimator {
    /// Creates an estimator for the given full-travel durations.
    ///
    /// Starts at [`UNKNOWN_POSITION`].
    pub fn new(open_ms: u32, close_ms: u32) -> Self {
        Self {
            open_ms: open_ms.max(1),
            close_ms: close_ms.max(1),
            position: UNKNOWN_POSITION,
            direction: None,
            last_update_ms: 0,
        }
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Direction of the running estimate, if any.
    #[inline]
    pub fn direction(&self) -> Option<TravelDirection> {
        self.direction
    }

    /// Full-travel duration for a direction.
    pub fn travel_ms(&self, direction: TravelDirection) -> u32 {
        match direction {
            TravelDirection::Opening => self.open_ms,
            TravelDirection::Closing => self.close_ms,
        }
    }

    /// Set a sensor-confirmed (or otherwise authoritative) position and halt.
    pub fn confirm(&mut self, position: f32) {
        self.position = position.clamp(0.0, 1.0);
        self.direction = None;
    }

    /// Forget the position (e.g. after a timeout).
    pub fn reset_unknown(&mut self) {
        self.confirm(UNKNOWN_POSITION);
    }

    /// Start moving in `direction` from the current position.
    ///
    /// The position is pulled into the estimate band straight away since the
    /// door has left whichever sensor it was on.
    pub fn start(&mut self, direction: TravelDirection, now_ms: u64) {
        self.direction = Some(direction);
        self.last_update_ms = now_ms;
        self.position = self.position.clamp(MIN_ESTIMATE, MAX_ESTIMATE);
    }

    /// Freeze the estimate at its current value.
    pub fn halt(&mut self) {
        self.direction = None;
    }

    /// Advance the estimate to `now_ms`. Returns the new position.
    pub fn update(&mut self, now_ms: u64) -> f32 {
        let Some(direction) = self.direction else {
            return self.position;
        };
        let elapsed = now_ms.saturating_sub(self.last_update_ms);
        if elapsed == 0 {
            return self.position;
        }
        let travel = self.travel_ms(direction) as f32;
        let delta = direction.sign() * elapsed as f32 / travel;
        self.position = (self.position + delta).clamp(MIN_ESTIMATE, MAX_ESTIMATE);
        self.last_update_ms = now_ms;
        self.position
    }

    /// True if continuing in `direction` has reached `target` within `tolerance`.
    pub fn has_reached(&self, target: f32, tolerance: f32) -> bool {
        match self.direction {
            Some(TravelDirection::Opening) => self.position >= target - tolerance,
            Some(TravelDirection::Closing) => self.position <= target + tolerance,
            None => (self.position - target).abs() <= tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    // =========================================================================
    // Estimation
    // =========================================================================

    #[test]
    fn starts_unknown() {
        let est = PositionEstimator::new(10_000, 12_000);
        assert_eq!(est.position(), UNKNOWN_POSITION);
        assert_eq!(est.direction(), None);
    }

    #[test]
    fn opening_uses_open_duration() {
        let mut est = PositionEstimator::new(10_000, 20_000);
        est.confirm(0.0);
        est.start(TravelDirection::Opening, 1_000);
        assert_eq!(est.position(), MIN_ESTIMATE);
        est.update(3_000);
        assert!(close(est.position(), 0.21));
    }

    #[test]
    fn closing_uses_close_duration() {
        let mut est = PositionEstimator::new(10_000, 20_000);
        est.confirm(1.0);
        est.start(TravelDirection::Closing, 0);
        est.update(10_000);
        assert!(close(est.position(), 0.49));
    }

    #[test]
    fn clamps_to_estimate_band() {
        let mut est = PositionEstimator::new(1_000, 1_000);
        est.confirm(0.5);
        est.start(TravelDirection::Closing, 0);
        est.update(100_000);
        assert_eq!(est.position(), MIN_ESTIMATE);

        est.start(TravelDirection::Opening, 100_000);
        est.update(200_000);
        assert_eq!(est.position(), MAX_ESTIMATE);
    }

    #[test]
    fn halted_estimate_does_not_move() {
        let mut est = PositionEstimator::new(1_000, 1_000);
        est.confirm(0.3);
        est.start(TravelDirection::Opening, 0);
        est.update(100);
        est.halt();
        let p = est.update(900);
        assert!(close(p, 0.4));
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let mut est = PositionEstimator::new(1_000, 1_000);
        est.confirm(0.5);
        est.start(TravelDirection::Opening, 500);
        assert_eq!(est.update(100), 0.5);
    }

    #[test]
    fn zero_duration_is_treated_as_one_ms() {
        let est = PositionEstimator::new(0, 0);
        assert_eq!(est.travel_ms(TravelDirection::Opening), 1);
    }

    // =========================================================================
    // Target crossing
    // =========================================================================

    #[test]
    fn opening_crosses_target_from_below() {
        let mut est = PositionEstimator::new(10_000, 10_000);
        est.confirm(0.0);
        est.start(TravelDirection::Opening, 0);
        est.update(4_800); // 0.49
        assert!(!est.has_reached(0.5, 0.0));
        assert!(est.has_reached(0.5, 0.02));
        est.update(5_000); // 0.51
        assert!(est.has_reached(0.5, 0.0));
    }

    #[test]
    fn closing_crosses_target_from_above() {
        let mut est = PositionEstimator::new(10_000, 10_000);
        est.confirm(1.0);
        est.start(TravelDirection::Closing, 0);
        est.update(4_800); // 0.51
        assert!(!est.has_reached(0.5, 0.0));
        assert!(est.has_reached(0.5, 0.02));
        est.update(5_000); // 0.49
        assert!(est.has_reached(0.5, 0.0));
    }

    #[test]
    fn idle_reached_uses_tolerance_band() {
        let mut est = PositionEstimator::new(10_000, 10_000);
        est.confirm(0.505);
        assert!(est.has_reached(0.5, 0.02));
        assert!(!est.has_reached(0.6, 0.01));
    }
}
