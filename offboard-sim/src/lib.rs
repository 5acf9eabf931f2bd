//! Kinematic stand-in for an autopilot with an offboard mode.
//!
//! The simulated vehicle flies straight towards the streamed setpoint at a
//! bounded speed, answers arm and mode requests the way a real autopilot
//! would, and reports pose, orientation, status and GPS telemetry.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub mod config;
mod noise;
pub mod vehicle_sim;

use common::{
    hw_abstraction::{AutopilotServices, SetpointSink},
    signals::TelemetryCache,
    types::{
        measurements::{GpsFix, Pose},
        setpoint::{StampedSetpoint, TargetSetpoint},
    },
};
use config::{HomeConfig, NoiseConfig};
use noise::Noise;
use vehicle_sim::{Initial, Simulation, VehicleParams, VehicleState};

/// Equatorial radius of the WGS84 ellipsoid [m]
const EARTH_RADIUS: f64 = 6_378_137.0;

#[derive(Debug, Clone)]
pub struct Configuration {
    pub simulation_rate: f32,
    pub telemetry_rate: f32,
    pub vehicle: VehicleParams,
    pub initial: Initial,
    pub home: HomeConfig,
    pub position_noise: NoiseConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        config::ToplevelConfig::default().into()
    }
}

#[derive(Clone)]
pub struct SimHandle(Arc<RwLock<Simulation>>);

pub trait Sim {
    fn vehicle_state(&self) -> VehicleState;
    fn set_armed(&self, arm: bool) -> bool;
    fn set_mode(&self, mode: &str) -> bool;
    fn push_setpoint(&self, setpoint: TargetSetpoint);
    fn step(&self, dt: f32);
}

impl SimHandle {
    pub fn new(config: Configuration) -> Self {
        let sim = Simulation::new(config.vehicle, config.initial);
        Self(Arc::new(RwLock::new(sim)))
    }

    fn read(&self) -> RwLockReadGuard<'_, Simulation> {
        self.0.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Simulation> {
        self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sim for SimHandle {
    fn vehicle_state(&self) -> VehicleState {
        self.read().state.clone()
    }

    fn set_armed(&self, arm: bool) -> bool {
        self.write().set_armed(arm)
    }

    fn set_mode(&self, mode: &str) -> bool {
        self.write().set_mode(mode)
    }

    fn push_setpoint(&self, setpoint: TargetSetpoint) {
        self.write().push_setpoint(setpoint);
    }

    fn step(&self, dt: f32) {
        self.write().update(dt);
    }
}

pub fn initialize(config: Configuration) -> Result<(Resources, SimHandle), Box<dyn std::error::Error>> {
    let noise = Noise::new_from_cfg(&config.position_noise)?;
    let home = config.home;
    let offboard_mode = config.vehicle.offboard_mode.clone();

    let vehicle = SimHandle::new(config);

    let services = SimulatedServices::new(vehicle.clone());
    let sink = SimulatedSink::new(vehicle.clone());
    let telemetry = SimulatedTelemetry {
        sim: vehicle.clone(),
        noise,
        home,
        offboard_mode,
    };

    Ok((Resources { services, sink, telemetry }, vehicle))
}

pub struct Resources {
    pub services: SimulatedServices,
    pub sink: SimulatedSink,
    pub telemetry: SimulatedTelemetry,
}

/// Arm and mode services, answered by the simulated autopilot.
pub struct SimulatedServices {
    sim: SimHandle,
}

impl SimulatedServices {
    pub fn new(sim: SimHandle) -> Self {
        Self { sim }
    }
}

impl AutopilotServices for SimulatedServices {
    async fn set_armed(&mut self, arm: bool) -> bool {
        self.sim.set_armed(arm)
    }

    async fn set_mode(&mut self, mode: &str) -> bool {
        self.sim.set_mode(mode)
    }
}

/// Setpoint channel into the simulated autopilot.
pub struct SimulatedSink {
    sim: SimHandle,
}

impl SimulatedSink {
    pub fn new(sim: SimHandle) -> Self {
        Self { sim }
    }
}

impl SetpointSink for SimulatedSink {
    async fn send_setpoint(&mut self, setpoint: StampedSetpoint) {
        log::trace!("[sim] Setpoint at {} us: {:?}", setpoint.stamp.as_micros(), setpoint.setpoint);
        self.sim.push_setpoint(setpoint.setpoint);
    }
}

/// Telemetry source, reporting the simulated vehicle state.
pub struct SimulatedTelemetry {
    sim: SimHandle,
    noise: Noise,
    home: HomeConfig,
    offboard_mode: String,
}

impl SimulatedTelemetry {
    /// Report one sample of every telemetry stream into the cache.
    pub fn publish(&mut self, cache: &TelemetryCache) {
        let state = self.sim.vehicle_state();

        cache.update_pose(Pose::new(self.noise.apply(state.position), state.rotation));
        cache.update_orientation(state.rotation);
        cache.update_status(state.armed, state.mode == self.offboard_mode);
        cache.update_gps(self.gps_fix(&state));
    }

    /// Flat-earth projection of the local position around the home position,
    /// with x pointing east and y pointing north.
    fn gps_fix(&self, state: &VehicleState) -> GpsFix {
        let east = state.position.x as f64;
        let north = state.position.y as f64;
        let latitude = self.home.latitude + (north / EARTH_RADIUS).to_degrees();
        let longitude = self.home.longitude
            + (east / (EARTH_RADIUS * self.home.latitude.to_radians().cos())).to_degrees();

        GpsFix {
            latitude,
            longitude,
            altitude: self.home.altitude + state.position.z,
        }
    }
}
