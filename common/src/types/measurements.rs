use nalgebra::{UnitQuaternion, Vector3};

/// Position and attitude of the vehicle in the local navigation frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    /// Position in meters, navigation frame
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at the given position with a level, north facing attitude.
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vector3::new(x, y, z), UnitQuaternion::identity())
    }
}

/// Arm and mode flags reported by the autopilot. Always replaced as a whole.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct VehicleStatus {
    pub armed: bool,
    /// Whether the autopilot accepts external (offboard/guided) setpoints
    pub offboard: bool,
}

impl VehicleStatus {
    pub const fn new(armed: bool, offboard: bool) -> Self {
        Self { armed, offboard }
    }
}

/// Global position fix. Cached for observability, never used for control.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GpsFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude above mean sea level, in meters
    pub altitude: f32,
}
