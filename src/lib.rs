//! # rs-garage
//!
//! A garage door controller for single-relay openers, with position
//! estimation, a lock state, and an audible warning before automated closes.
//!
//! ## Features
//!
//! - **One relay, full control**: tracks the opener's open/stop/close/stop
//!   cycle and pulses as many times as needed to reach a target
//! - **Position estimation**: dead reckoning between the closed and open sensors
//! - **Close warning**: automated closes play an RTTTL tune first; attended
//!   button presses skip it
//! - **Lock**: a closed sub-state that ignores the remote door button
//! - **Failure reporting**: sensor contradictions and timeouts become events
//!   and an `Unknown` state rather than panics
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and sink abstractions
//! - `controller` - The state machine that ties everything together
//! - `door`, `commands`, `events` - State, command and event types
//! - `position`, `buttons`, `rtttl` - Estimator, button decoding, tune playback
//! - `hal` - Concrete implementations (mock and simulator for testing, GPIO and esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_garage::{Config, DoorController, DoorState, GarageDoor, TargetState};
//! use rs_garage::hal::{MockDoorHardware, MockSink};
//!
//! let mut door = GarageDoor::new(Config::default(), MockDoorHardware::open(), MockSink::new());
//! door.setup(0, false).unwrap();
//!
//! // An automated close warns first; no relay pulse yet
//! door.request(TargetState::Closed).unwrap();
//! door.tick(10).unwrap();
//! assert_eq!(door.state(), DoorState::CloseWarning);
//! assert_eq!(door.hardware().pulse_count, 0);
//!
//! // Once the tune is over the relay is pulsed
//! door.hardware_mut().warning.finish();
//! door.tick(20).unwrap();
//! assert_eq!(door.state(), DoorState::Closing);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Local button ladder decoding and remote edge detection.
pub mod buttons;
/// Command types and outcomes.
pub mod commands;
/// Controller configuration.
pub mod config;
/// The garage door state machine.
pub mod controller;
/// Door, target and cover operation types.
pub mod door;
/// Error types.
pub mod error;
/// Named events and travel directions.
pub mod events;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Dead-reckoning position estimator.
pub mod position;
/// RTTTL tune parsing and buzzer playback.
pub mod rtttl;
/// Core traits for hardware abstraction and reporting.
pub mod traits;

/// Shared message types for host payloads (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

/// Thread-safe shared controller for hosts (requires `std`).
#[cfg(feature = "std")]
pub mod services;

// Re-exports for convenience
pub use buttons::{ButtonThresholds, LocalButton};
pub use commands::{CommandOutcome, DoorCommand, IgnoreReason};
pub use config::{Config, DeviceConfig, DoorConfig, TimingConfig};
pub use controller::{DoorController, GarageDoor};
pub use door::{CoverOperation, DoorSnapshot, DoorState, TargetState};
pub use error::{ConfigError, HardwareError, ParseCommandError, RtttlError, Signal};
pub use events::{DoorEvent, Travel};
pub use traits::{ButtonLadder, Clock, DoorHardware, DoorSink, WarningPlayer};
