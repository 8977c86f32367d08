//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test doubles for desktop development
//! - `sim`: Physical opener model for running the controller end to end
//! - `gpio`: Any board with `embedded-hal` 1.0 pins
//! - `log_sink`: Sink that reports through the `log` facade
//! - `esp32`: ESP32 pin map, clock and button ladder ADC (requires `esp32` feature)

pub mod gpio;
pub mod log_sink;
pub mod mock;
pub mod sim;

#[cfg(feature = "std")]
pub mod std_clock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use gpio::*;
pub use log_sink::*;
pub use mock::*;
pub use sim::*;

#[cfg(feature = "std")]
pub use std_clock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
