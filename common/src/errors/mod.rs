use core::fmt;

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OffboardError {
    #[error("The {service} service call was rejected by the autopilot.")]
    ServiceFailure { service: Service },
    #[error("No {0} sample has been received yet.")]
    MissingTelemetry(Telemetry),
    #[error("Command `{0}` is not supported.")]
    UnsupportedCommand(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{field}` must be a positive, finite number.")]
    NotPositive { field: &'static str },
    #[error("Failed to read configuration file: {0}")]
    Io(String),
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Autopilot services the core calls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Arming,
    SetMode,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Arming => f.write_str("arming"),
            Service::SetMode => f.write_str("set-mode"),
        }
    }
}

/// Telemetry inputs a command may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Telemetry {
    Pose,
    Heading,
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Telemetry::Pose => f.write_str("pose"),
            Telemetry::Heading => f.write_str("heading"),
        }
    }
}
