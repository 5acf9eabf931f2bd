use mutex::raw_impls::cs::CriticalSectionRawMutex as M;
use nalgebra::UnitQuaternion;

use crate::{
    errors::{OffboardError, Telemetry},
    frames::heading_from_quaternion,
    sync::watch::Watch,
    types::measurements::{GpsFix, Pose, VehicleStatus},
};

/// Latest telemetry from the autopilot. Every field starts out empty and is
/// replaced whole by the matching `update_*` call.
pub struct TelemetryCache {
    pub pose: Watch<Pose, M>,
    pub status: Watch<VehicleStatus, M>,
    pub orientation: Watch<UnitQuaternion<f32>, M>,
    /// Heading derived from the latest orientation sample [rad]
    pub heading: Watch<f32, M>,
    pub gps: Watch<GpsFix, M>,
}

impl TelemetryCache {
    pub const fn new() -> Self {
        Self {
            pose: Watch::new(),
            status: Watch::new(),
            orientation: Watch::new(),
            heading: Watch::new(),
            gps: Watch::new(),
        }
    }

    pub fn update_pose(&self, pose: Pose) {
        self.pose.send(pose);
    }

    pub fn update_status(&self, armed: bool, offboard: bool) {
        let status = VehicleStatus::new(armed, offboard);
        if !self.status.is(&status) {
            debug!("[telemetry] Vehicle status changed: {:?}", status);
        }
        self.status.send(status);
    }

    /// Store the orientation sample and recompute the heading from it.
    pub fn update_orientation(&self, orientation: UnitQuaternion<f32>) {
        self.heading.send(heading_from_quaternion(&orientation));
        self.orientation.send(orientation);
    }

    pub fn update_gps(&self, fix: GpsFix) {
        self.gps.send(fix);
    }

    /// Locally set the armed flag after a service call, keeping the offboard flag.
    pub fn set_armed(&self, armed: bool) {
        self.status
            .modify_or(VehicleStatus::default(), |status| status.armed = armed);
    }

    /// Locally set the offboard flag after a service call, keeping the armed flag.
    pub fn set_offboard(&self, offboard: bool) {
        self.status
            .modify_or(VehicleStatus::default(), |status| status.offboard = offboard);
    }

    /// Read every field once. Decisions made from the returned snapshot do
    /// not see telemetry arriving while they are being computed.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            pose: self.pose.try_get(),
            heading: self.heading.try_get(),
            status: self.status.try_get().unwrap_or_default(),
        }
    }
}

impl Default for TelemetryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetrySnapshot {
    pub pose: Option<Pose>,
    pub heading: Option<f32>,
    /// Defaults to disarmed and not offboard until a status sample arrives
    pub status: VehicleStatus,
}

impl TelemetrySnapshot {
    pub fn pose(&self) -> Result<Pose, OffboardError> {
        self.pose
            .ok_or(OffboardError::MissingTelemetry(Telemetry::Pose))
    }

    pub fn heading(&self) -> Result<f32, OffboardError> {
        self.heading
            .ok_or(OffboardError::MissingTelemetry(Telemetry::Heading))
    }

    /// Pose and heading together, failing on whichever is missing first.
    pub fn pose_and_heading(&self) -> Result<(Pose, f32), OffboardError> {
        Ok((self.pose()?, self.heading()?))
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn starts_empty() {
        let cache = TelemetryCache::new();
        let snapshot = cache.snapshot();

        assert_eq!(snapshot.pose, None);
        assert_eq!(snapshot.heading, None);
        assert_eq!(snapshot.status, VehicleStatus::new(false, false));
        assert_eq!(
            snapshot.pose_and_heading(),
            Err(OffboardError::MissingTelemetry(Telemetry::Pose))
        );
    }

    #[test]
    fn orientation_updates_heading() {
        let cache = TelemetryCache::new();
        cache.update_orientation(UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2));

        assert_relative_eq!(cache.heading.try_get().unwrap(), FRAC_PI_2, epsilon = 1e-6);

        cache.update_orientation(UnitQuaternion::identity());
        assert_eq!(cache.heading.try_get(), Some(0.0));
    }

    #[test]
    fn missing_heading_is_reported() {
        let cache = TelemetryCache::new();
        cache.update_pose(Pose::at(1.0, 2.0, 3.0));

        assert_eq!(
            cache.snapshot().pose_and_heading(),
            Err(OffboardError::MissingTelemetry(Telemetry::Heading))
        );
    }

    #[test]
    fn local_flags_keep_the_other_flag() {
        let cache = TelemetryCache::new();

        cache.set_armed(true);
        assert_eq!(cache.status.try_get(), Some(VehicleStatus::new(true, false)));

        cache.update_status(false, true);
        cache.set_armed(true);
        assert_eq!(cache.status.try_get(), Some(VehicleStatus::new(true, true)));

        cache.set_offboard(false);
        assert_eq!(cache.status.try_get(), Some(VehicleStatus::new(true, false)));
    }
}
