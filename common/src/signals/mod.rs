//! Shared controller state.
//!
//! One [`FlightControlState`] is created at startup and handed by reference to
//! the telemetry handlers, the commander and the publish loop.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use mutex::raw_impls::cs::CriticalSectionRawMutex as M;

use crate::{
    config::ControllerConfig,
    frames::FrameTag,
    sync::watch::Watch,
    tasks::{commander::Request, safety_gate::SafetyGate},
    types::{setpoint::TargetSetpoint, status::StatusSnapshot},
};

mod setpoint;
mod telemetry;

pub use setpoint::SetpointStore;
pub use telemetry::{TelemetryCache, TelemetrySnapshot};

/// Number of requests which may be queued for the commander.
pub const REQUEST_QUEUE_LEN: usize = 8;

/// Queue of gesture tokens, position and yaw requests, handled in order.
pub type RequestChannel = Channel<CriticalSectionRawMutex, Request, REQUEST_QUEUE_LEN>;

pub struct FlightControlState {
    /// Latest telemetry from the autopilot bridge
    pub telemetry: TelemetryCache,
    /// The target streamed to the autopilot on every tick
    pub target: SetpointStore,
    /// Status snapshot, refreshed by the publish loop
    pub status: Watch<StatusSnapshot, M>,
    /// Transform used by the most recent position request
    pub last_frame: Watch<FrameTag, M>,
    /// Inbound requests for the commander
    pub requests: RequestChannel,
    config: ControllerConfig,
}

impl FlightControlState {
    /// Create the state with the initial zero position, zero yaw target.
    pub fn new(config: ControllerConfig) -> Self {
        let initial = TargetSetpoint::construct(0.0, 0.0, 0.0, 0.0).with_yaw_rate(config.yaw_rate);

        Self {
            telemetry: TelemetryCache::new(),
            target: SetpointStore::new(initial),
            status: Watch::new(),
            last_frame: Watch::new(),
            requests: Channel::new(),
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn safety_gate(&self) -> SafetyGate {
        SafetyGate::new(self.config.airborne_altitude)
    }
}

impl Default for FlightControlState {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
