//! Command and setpoint core of a gesture driven offboard controller.
//!
//! Telemetry from the autopilot bridge is cached in a [`signals::FlightControlState`],
//! gesture tokens and position requests are turned into position/yaw targets by the
//! [`tasks::commander`], and the [`tasks::publisher`] streams the current target back
//! to the autopilot at a fixed rate.

// Logging macros, must stay first so every module sees them
#[macro_use]
mod logging;

pub mod config;
pub mod consts;
pub mod errors;
pub mod frames;
pub mod hw_abstraction;
pub mod signals;
pub mod sync;
pub mod tasks;
pub mod types;

// Re-exported for implementors
pub use embassy_futures;
pub use embassy_time;
pub use nalgebra;
