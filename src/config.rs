//! Controller configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. Every timing and threshold the
//! controller depends on lives here rather than in constants, so tests can
//! shrink durations and hosts can tune for their opener.
//!
//! # Example
//!
//! ```rust
//! use rs_garage::config::{Config, DeviceConfig, DoorConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert!(config.validate().is_ok());
//!
//! // Or customize
//! let config = Config::default()
//!     .with_door(DoorConfig::default().with_open_duration_ms(14_000))
//!     .with_device(DeviceConfig::default().with_object_id("shop_door"));
//! assert_eq!(config.door.open_duration_ms, 14_000);
//! ```

use heapless::String as HString;

use crate::buttons::ButtonThresholds;
use crate::error::ConfigError;
use crate::rtttl::{Tune, DEFAULT_WARNING_TUNE};

/// Maximum length for short config strings (names, object ids)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for RTTTL tune strings
pub const MAX_TUNE_STRING: usize = 256;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for tune strings
pub type TuneString = HString<MAX_TUNE_STRING>;

// ============================================================================
// Helpers for creating heapless strings
// ============================================================================

fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    truncated(s)
}

/// Create a TuneString from a &str, truncating if too long
pub fn tune_string(s: &str) -> TuneString {
    truncated(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete controller configuration
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Door travel configuration
    pub door: DoorConfig,
    /// Relay, sensor and polling timings
    pub timing: TimingConfig,
    /// Local button ladder thresholds
    pub buttons: ButtonThresholds,
    /// Device identification and warning tune
    pub device: DeviceConfig,
}

impl Config {
    /// Set door configuration
    pub fn with_door(mut self, door: DoorConfig) -> Self {
        self.door = door;
        self
    }

    /// Set timing configuration
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set button ladder thresholds
    pub fn with_buttons(mut self, buttons: ButtonThresholds) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Check the configuration for values the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.door.open_duration_ms == 0 {
            return Err(ConfigError::ZeroTravelDuration("open"));
        }
        if self.door.close_duration_ms == 0 {
            return Err(ConfigError::ZeroTravelDuration("close"));
        }
        if !(0.0..0.5).contains(&self.door.position_tolerance) {
            return Err(ConfigError::Tolerance);
        }
        if self.timing.control_pin_active_ms == 0 {
            return Err(ConfigError::ZeroPulseWidth);
        }
        if !(250..=1000).contains(&self.timing.publish_interval_ms) {
            return Err(ConfigError::PublishInterval(self.timing.publish_interval_ms));
        }
        if !self.buttons.is_ordered() {
            return Err(ConfigError::ThresholdOrder);
        }
        Tune::parse(&self.device.warning_tune).map_err(ConfigError::WarningTune)?;
        Ok(())
    }
}

// ============================================================================
// Door Config
// ============================================================================

/// Door travel configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoorConfig {
    /// Normal closed-to-open travel time in milliseconds
    pub open_duration_ms: u32,
    /// Normal open-to-closed travel time in milliseconds
    pub close_duration_ms: u32,
    /// Band around a requested position treated as reached
    pub position_tolerance: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_duration_ms: 10_000,
            close_duration_ms: 10_000,
            position_tolerance: 0.01,
        }
    }
}

impl DoorConfig {
    /// Set the open travel duration
    pub fn with_open_duration_ms(mut self, ms: u32) -> Self {
        self.open_duration_ms = ms;
        self
    }

    /// Set the close travel duration
    pub fn with_close_duration_ms(mut self, ms: u32) -> Self {
        self.close_duration_ms = ms;
        self
    }

    /// Set the position tolerance
    pub fn with_position_tolerance(mut self, tolerance: f32) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    /// Longest of the two travel durations
    pub fn max_duration_ms(&self) -> u32 {
        self.open_duration_ms.max(self.close_duration_ms)
    }
}

// ============================================================================
// Timing Config
// ============================================================================

/// Relay pulse, sensor settle and polling intervals
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingConfig {
    /// How long the relay is held active for one pulse
    pub control_pin_active_ms: u32,
    /// Minimum gap after a pulse before the next may start
    pub control_pin_inactive_ms: u32,
    /// Settle time after a transition before terminal sensors are trusted
    pub sensor_read_delay_ms: u32,
    /// Minimum interval between button ladder ADC reads
    pub button_read_interval_ms: u32,
    /// Minimum interval between state publishes while moving
    pub publish_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            control_pin_active_ms: 200,
            control_pin_inactive_ms: 200,
            sensor_read_delay_ms: 2_000,
            button_read_interval_ms: 50,
            publish_interval_ms: 1_000,
        }
    }
}

impl TimingConfig {
    /// Set the relay pulse width
    pub fn with_control_pin_active_ms(mut self, ms: u32) -> Self {
        self.control_pin_active_ms = ms;
        self
    }

    /// Set the gap between relay pulses
    pub fn with_control_pin_inactive_ms(mut self, ms: u32) -> Self {
        self.control_pin_inactive_ms = ms;
        self
    }

    /// Set the sensor settle delay
    pub fn with_sensor_read_delay_ms(mut self, ms: u32) -> Self {
        self.sensor_read_delay_ms = ms;
        self
    }

    /// Set the button ladder read interval
    pub fn with_button_read_interval_ms(mut self, ms: u32) -> Self {
        self.button_read_interval_ms = ms;
        self
    }

    /// Set the publish interval while moving
    pub fn with_publish_interval_ms(mut self, ms: u32) -> Self {
        self.publish_interval_ms = ms;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable name
    pub name: ShortString,
    /// Stable id used in qualified event names
    pub object_id: ShortString,
    /// RTTTL tune played before an automated close
    pub warning_tune: TuneString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("Garage Door"),
            object_id: short_string("garage_door"),
            warning_tune: tune_string(DEFAULT_WARNING_TUNE),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the object id
    pub fn with_object_id(mut self, id: &str) -> Self {
        self.object_id = short_string(id);
        self
    }

    /// Set the close warning tune
    pub fn with_warning_tune(mut self, tune: &str) -> Self {
        self.warning_tune = tune_string(tune);
        self
    }
}
