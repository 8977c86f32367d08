//! Trait definitions for hardware abstraction and outbound reporting.
//!
//! This module defines the seams that allow the door controller to:
//! - Run on different hardware (ESP32 GPIO, simulated opener, mocks)
//! - Report state and events to whatever host it is embedded in
//!
//! # Submodules
//!
//! - `hardware`: Door sensors, buttons, relay, warning buzzer, clock
//! - `sink`: State, lock, event and travel time publishing
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`DoorHardware`]: Everything the controller reads and drives
//! - [`ButtonLadder`]: The local button ADC channel
//! - [`WarningPlayer`]: Close warning tune playback
//! - [`Clock`]: Time source for `no_std` environments
//!
//! # Reporting
//!
//! - [`DoorSink`]: Cover state, lock state, events, travel times

pub mod hardware;
pub mod sink;

pub use hardware::*;
pub use sink::*;
