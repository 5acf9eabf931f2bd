use common::errors::ConfigError;
use serde::{Deserialize, Serialize};

use crate::{
    vehicle_sim::{Initial, VehicleParams},
    Configuration,
};

/// The simulator tables of a configuration file. Every table is optional.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct ToplevelConfig {
    #[serde(default)]
    pub simulation: SimConfig,
    #[serde(default)]
    pub initial: InitialConfig,
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub position_noise: NoiseConfig,
}

impl ToplevelConfig {
    /// Reject rates and limits the runners and the vehicle model cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("simulation_rate", self.simulation.simulation_rate),
            ("telemetry_rate", self.simulation.telemetry_rate),
            ("max_speed", self.vehicle.max_speed),
            ("max_yaw_rate", self.vehicle.max_yaw_rate),
        ];

        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }

        Ok(())
    }
}

impl From<ToplevelConfig> for Configuration {
    fn from(config: ToplevelConfig) -> Self {
        let defaults = VehicleParams::default();
        Configuration {
            simulation_rate: config.simulation.simulation_rate,
            telemetry_rate: config.simulation.telemetry_rate,
            vehicle: VehicleParams {
                max_speed: config.vehicle.max_speed,
                max_yaw_rate: config.vehicle.max_yaw_rate,
                landed_altitude: config.vehicle.landed_altitude,
                stream_timeout: config.vehicle.stream_timeout_ms as f32 / 1000.0,
                modes: config.vehicle.modes.unwrap_or(defaults.modes),
                offboard_mode: config.vehicle.offboard_mode,
                failsafe_mode: config.vehicle.failsafe_mode,
            },
            initial: Initial {
                position: config.initial.position.into(),
                yaw: config.initial.yaw,
            },
            home: config.home,
            position_noise: config.position_noise,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Rate at which the vehicle model is stepped [Hz]
    pub simulation_rate: f32,
    /// Rate at which telemetry is reported [Hz]
    pub telemetry_rate: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation_rate: 200.0,
            telemetry_rate: 50.0,
        }
    }
}

/// Initial condition of the vehicle within a simulation.
///
/// Any fields not defined will be initialized with zero.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct InitialConfig {
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub yaw: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub max_speed: f32,
    pub max_yaw_rate: f32,
    pub landed_altitude: f32,
    /// How long the setpoint stream may stall before offboard is left
    pub stream_timeout_ms: u64,
    /// Accepted mode names, the first one is the startup mode
    pub modes: Option<Vec<String>>,
    pub offboard_mode: String,
    pub failsafe_mode: String,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        let params = VehicleParams::default();
        Self {
            max_speed: params.max_speed,
            max_yaw_rate: params.max_yaw_rate,
            landed_altitude: params.landed_altitude,
            stream_timeout_ms: (params.stream_timeout * 1000.0) as u64,
            modes: None,
            offboard_mode: params.offboard_mode,
            failsafe_mode: params.failsafe_mode,
        }
    }
}

/// Geodetic origin of the local navigation frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f32,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            latitude: 55.3959,
            longitude: 10.3883,
            altitude: 15.0,
        }
    }
}

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub std_dev: Option<[f32; 3]>,
    pub bias: Option<[f32; 3]>,
}
