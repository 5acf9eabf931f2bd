use common::{config::ControllerConfig, errors::ConfigError};
use serde::{Deserialize, Serialize};

/// Configuration file of the node. The `[controller]` table configures the
/// gesture controller, the remaining tables configure the simulator.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(flatten)]
    pub sim: offboard_sim::config::ToplevelConfig,
}

pub fn load_from_file_path(path: &str) -> Result<NodeConfig, ConfigError> {
    let string = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{path}: {e}")))?;
    from_toml_str(&string)
}

pub fn from_toml_str(string: &str) -> Result<NodeConfig, ConfigError> {
    let config: NodeConfig = toml::from_str(string).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.controller.validate()?;
    config.sim.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_is_valid() {
        let config = from_toml_str(include_str!("../node_config.toml")).unwrap();

        assert_eq!(config.controller, ControllerConfig::default());
        assert_eq!(config.sim.vehicle.stream_timeout_ms, 500);
        assert_eq!(config.sim.position_noise.std_dev, Some([0.005; 3]));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config.controller, ControllerConfig::default());
    }

    #[test]
    fn invalid_controller_is_rejected() {
        let result = from_toml_str("[controller]\npublish_hz = 0\n");
        assert!(result.is_err());

        let result = from_toml_str("[controller]\ntakeoff_height = \"high\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn invalid_sim_rates_are_rejected() {
        let result = from_toml_str("[simulation]\nsimulation_rate = 0.0\n");
        assert_eq!(
            result.err(),
            Some(ConfigError::NotPositive {
                field: "simulation_rate"
            })
        );

        let result = from_toml_str("[simulation]\ntelemetry_rate = -1.0\n");
        assert_eq!(
            result.err(),
            Some(ConfigError::NotPositive {
                field: "telemetry_rate"
            })
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_from_file_path("/nonexistent/node_config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
