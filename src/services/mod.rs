//! Host-side services for running the door controller in a threaded program.
//!
//! The controller itself is a plain value owned by one loop. Hosts that
//! also accept commands from other threads (a hub connection, a console)
//! wrap it in a [`SharedDoor`] and share that through an `Arc`:
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_garage::{Config, GarageDoor};
//! use rs_garage::hal::{MockDoorHardware, MockSink};
//! use rs_garage::services::SharedDoor;
//!
//! let door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
//! let shared = Arc::new(SharedDoor::new(door));
//! shared.setup(false).unwrap();
//!
//! // Control loop thread calls shared.tick(); others read snapshots
//! let snapshot = shared.snapshot();
//! assert!(!snapshot.locked);
//! ```

pub mod shared;

pub use shared::*;
