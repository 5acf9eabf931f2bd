use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::consts::{ARRIVAL_THRESHOLD, BODY_FRAME_ID, DEFAULT_YAW_RATE, OFFBOARD_MODE};
use crate::errors::ConfigError;

/// Tunables of the command dispatcher and publish loop.
///
/// Any field left out of a configuration file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Altitude commanded by `Takeoff` [m]
    pub takeoff_height: f32,
    /// Altitude commanded by `Land` [m]
    pub land_height: f32,
    /// Altitude above which an armed, offboard vehicle counts as airborne [m]
    pub airborne_altitude: f32,
    /// Distance moved by `Forward`/`Backward` [m]
    pub forward_step: f32,
    /// Distance moved by `Left`/`Right` [m]
    pub lateral_step: f32,
    /// Distance moved by `Up`/`Down` [m]
    pub vertical_step: f32,
    /// Yaw rate carried on every setpoint [rad/s]
    pub yaw_rate: f32,
    /// Summed per-axis distance at which the target counts as reached [m]
    pub arrival_threshold: f32,
    /// Rate of the setpoint stream [Hz]
    pub publish_hz: u32,
    /// Delays before the first tick, giving telemetry time to arrive [ms]
    pub settle_ms: [u64; 2],
    /// Mode requested by the `Offboard` command
    pub offboard_mode: String,
    /// Frame id of position requests that are relative to the vehicle body
    pub body_frame_id: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            takeoff_height: 0.5,
            land_height: 0.1,
            airborne_altitude: 0.3,
            forward_step: 1.0,
            lateral_step: 0.6,
            vertical_step: 0.3,
            yaw_rate: DEFAULT_YAW_RATE,
            arrival_threshold: ARRIVAL_THRESHOLD,
            publish_hz: 10,
            settle_ms: [1000, 2000],
            offboard_mode: OFFBOARD_MODE.into(),
            body_frame_id: BODY_FRAME_ID.into(),
        }
    }
}

impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("takeoff_height", self.takeoff_height),
            ("airborne_altitude", self.airborne_altitude),
            ("forward_step", self.forward_step),
            ("lateral_step", self.lateral_step),
            ("vertical_step", self.vertical_step),
            ("yaw_rate", self.yaw_rate),
            ("arrival_threshold", self.arrival_threshold),
        ];

        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }

        // Landing at exactly zero is fine, below ground is not
        if !(self.land_height.is_finite() && self.land_height >= 0.0) {
            return Err(ConfigError::NotPositive {
                field: "land_height",
            });
        }

        if self.publish_hz == 0 {
            return Err(ConfigError::NotPositive {
                field: "publish_hz",
            });
        }

        Ok(())
    }

    pub fn publish_period(&self) -> Duration {
        Duration::from_hz(self.publish_hz as u64)
    }

    pub fn settle_delays(&self) -> [Duration; 2] {
        self.settle_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ControllerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.publish_period(), Duration::from_millis(100));
        assert_eq!(
            config.settle_delays(),
            [Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ControllerConfig = toml::from_str(
            r#"
            takeoff_height = 1.5
            publish_hz = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.takeoff_height, 1.5);
        assert_eq!(config.publish_hz, 20);
        assert_eq!(config.land_height, 0.1);
        assert_eq!(config.offboard_mode, "OFFBOARD");
        assert_eq!(config.body_frame_id, "base_link");
    }

    #[test]
    fn rejects_bad_values() {
        let config = ControllerConfig {
            lateral_step: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "lateral_step"
            })
        );

        let config = ControllerConfig {
            land_height: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            publish_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            yaw_rate: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
