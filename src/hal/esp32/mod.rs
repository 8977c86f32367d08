//! ESP32-C3 SuperMini hardware for the garage door controller.
//!
//! The door itself is driven through [`GpioDoorHardware`](crate::hal::GpioDoorHardware)
//! using `esp-idf-hal` pin drivers, which implement the `embedded-hal` 1.0
//! digital traits. This module adds the pieces that are ESP-IDF specific.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Relay**: opto-isolated relay module across the opener's wall button terminals
//! - **Sensors**: two reed switches to ground (closed and open positions)
//! - **Local panel**: resistor ladder on one ADC pin (door, lock, light buttons)
//! - **Remote**: two-channel RF receiver outputs (door, light)
//! - **Buzzer**: active buzzer for the close warning
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod clock;
mod ladder;

pub use clock::Esp32Clock;
pub use ladder::Esp32ButtonLadder;

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    // =========================================================================
    // Opener
    // =========================================================================

    /// Relay output (active high)
    pub const RELAY: i32 = 2;

    /// Local button resistor ladder - ADC1
    pub const BUTTON_LADDER: i32 = 3;

    // =========================================================================
    // Position sensors (reed to ground, internal pull-up)
    // =========================================================================

    /// Closed-position reed switch
    pub const CLOSED_SENSOR: i32 = 4;

    /// Open-position reed switch
    pub const OPEN_SENSOR: i32 = 5;

    // =========================================================================
    // Remote receiver (active low)
    // =========================================================================

    /// Remote door button
    pub const REMOTE_DOOR: i32 = 6;

    /// Remote light button
    pub const REMOTE_LIGHT: i32 = 7;

    // =========================================================================
    // Indicators
    // =========================================================================

    /// Close warning buzzer
    pub const BUZZER: i32 = 10;

    /// Onboard blue LED, mirrors the relay
    pub const STATUS_LED: i32 = 8;
}
