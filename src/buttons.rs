//! Local button ladder classification and remote button edge detection.
//!
//! The local wall panel wires its buttons as a resistor ladder onto a single
//! ADC pin. Each button pulls the pin to a distinct level; near-zero means
//! the panel is unplugged. [`ButtonThresholds`] splits the 0..1023 range into
//! non-overlapping bands:
//!
//! | Raw | Button | Nominal |
//! |-----|--------|---------|
//! | `< disconnected_below` (50) | [`LocalButton::Disconnected`] | 0 |
//! | `< none_below` (284) | [`LocalButton::None`] | 133 |
//! | `< light_below` (574) | [`LocalButton::Light`] | 434 |
//! | `< lock_below` (854) | [`LocalButton::Lock`] | 714 |
//! | otherwise | [`LocalButton::Door`] | 993 |
//!
//! Reads are rate limited and only a *change* in classification is reported,
//! so a held button fires once.
//!
//! # Example
//!
//! ```rust
//! use rs_garage::buttons::{ButtonThresholds, LocalButton, LocalButtonReader};
//!
//! let mut reader = LocalButtonReader::new(ButtonThresholds::default(), 50);
//!
//! assert_eq!(reader.poll(0, || 133), None); // first read: no button
//! assert_eq!(reader.poll(60, || 900), Some(LocalButton::Door));
//! assert_eq!(reader.poll(120, || 900), None); // still held
//! ```

/// Logical identity of the local button ladder reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LocalButton {
    /// Ladder not connected (wiring fault).
    Disconnected,
    /// Connected, nothing pressed.
    #[default]
    None,
    /// Door button.
    Door,
    /// Lock toggle button.
    Lock,
    /// Light button.
    Light,
}

impl LocalButton {
    /// Returns the button name as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LocalButton::Disconnected => "disconnected",
            LocalButton::None => "none",
            LocalButton::Door => "door",
            LocalButton::Lock => "lock",
            LocalButton::Light => "light",
        }
    }
}

/// Upper bounds (exclusive) of each ladder band on a 0..1023 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonThresholds {
    /// Below this the ladder is disconnected.
    pub disconnected_below: u16,
    /// Below this no button is pressed.
    pub none_below: u16,
    /// Below this the light button is pressed.
    pub light_below: u16,
    /// Below this the lock button is pressed; at or above, the door button.
    pub lock_below: u16,
}

impl Default for ButtonThresholds {
    fn default() -> Self {
        Self {
            disconnected_below: 50,
            none_below: 284,
            light_below: 574,
            lock_below: 854,
        }
    }
}

impl ButtonThresholds {
    /// Classify a raw ADC value.
    pub const fn classify(&self, raw: u16) -> LocalButton {
        if raw < self.disconnected_below {
            LocalButton::Disconnected
        } else if raw < self.none_below {
            LocalButton::None
        } else if raw < self.light_below {
            LocalButton::Light
        } else if raw < self.lock_below {
            LocalButton::Lock
        } else {
            LocalButton::Door
        }
    }

    /// True when each band is non-empty and bands are in order.
    pub const fn is_ordered(&self) -> bool {
        self.disconnected_below > 0
            && self.disconnected_below < self.none_below
            && self.none_below < self.light_below
            && self.light_below < self.lock_below
    }
}

/// Rate-limited, change-detecting reader for the local button ladder.
#[derive(Clone, Debug)]
pub struct LocalButtonReader {
    thresholds: ButtonThresholds,
    interval_ms: u32,
    last_read_ms: Option<u64>,
    current: LocalButton,
}

impl LocalButtonReader {
    /// Create a reader that samples at most every `interval_ms`.
    pub fn new(thresholds: ButtonThresholds, interval_ms: u32) -> Self {
        Self {
            thresholds,
            interval_ms,
            last_read_ms: None,
            current: LocalButton::None,
        }
    }

    /// Last classified button.
    #[inline]
    pub fn current(&self) -> LocalButton {
        self.current
    }

    /// True if enough time has passed since the last sample.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_read_ms {
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms as u64,
            None => true,
        }
    }

    /// Sample the ladder with `read` if due.
    ///
    /// Returns the new button when the classification changed from the
    /// previous sample. The first sample seeds the state and reports only
    /// a non-`None` reading.
    pub fn poll(&mut self, now_ms: u64, read: impl FnOnce() -> u16) -> Option<LocalButton> {
        self.try_poll::<()>(now_ms, || Ok(read())).unwrap_or(None)
    }

    /// Like [`poll`](Self::poll) for a fallible read.
    pub fn try_poll<E>(
        &mut self,
        now_ms: u64,
        read: impl FnOnce() -> Result<u16, E>,
    ) -> Result<Option<LocalButton>, E> {
        if !self.is_due(now_ms) {
            return Ok(None);
        }
        let raw = read()?;
        self.last_read_ms = Some(now_ms);
        let button = self.thresholds.classify(raw);
        if button == self.current {
            return Ok(None);
        }
        self.current = button;
        Ok(Some(button))
    }
}

/// Rising-edge detector for a boolean input.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    /// Create a detector that assumes the input starts released.
    pub const fn new() -> Self {
        Self { last: false }
    }

    /// Create a detector seeded with the current input level.
    pub const fn seeded(level: bool) -> Self {
        Self { last: level }
    }

    /// Feed a new level. Returns true on a released-to-pressed transition.
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && !self.last;
        self.last = level;
        edge
    }
}
