use embassy_time::Instant;
use nalgebra::Vector3;
use num_enum::IntoPrimitive;

use crate::consts::DEFAULT_YAW_RATE;

use super::measurements::Pose;

/// Which fields of a setpoint the autopilot should ignore, using the bit layout
/// of MAVLink's `POSITION_TARGET_TYPEMASK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMask(u16);

bitflags::bitflags! {
    impl ControlMask: u16 {
        /// **Bit 0** - Ignore the x position.
        const IGNORE_PX = 1 << 0;
        /// **Bit 1** - Ignore the y position.
        const IGNORE_PY = 1 << 1;
        /// **Bit 2** - Ignore the z position.
        const IGNORE_PZ = 1 << 2;
        /// **Bit 3** - Ignore the x velocity.
        const IGNORE_VX = 1 << 3;
        /// **Bit 4** - Ignore the y velocity.
        const IGNORE_VY = 1 << 4;
        /// **Bit 5** - Ignore the z velocity.
        const IGNORE_VZ = 1 << 5;
        /// **Bit 6** - Ignore the x acceleration/force.
        const IGNORE_AFX = 1 << 6;
        /// **Bit 7** - Ignore the y acceleration/force.
        const IGNORE_AFY = 1 << 7;
        /// **Bit 8** - Ignore the z acceleration/force.
        const IGNORE_AFZ = 1 << 8;
        /// **Bit 9** - Interpret the acceleration fields as force.
        const FORCE = 1 << 9;
        /// **Bit 10** - Ignore the yaw angle.
        const IGNORE_YAW = 1 << 10;
        /// **Bit 11** - Ignore the yaw rate.
        const IGNORE_YAW_RATE = 1 << 11;
    }
}

impl ControlMask {
    /// Position, yaw and yaw rate control. Velocity and acceleration
    /// fields carry no meaning.
    pub const POSITION_YAW: Self = Self::IGNORE_VX
        .union(Self::IGNORE_VY)
        .union(Self::IGNORE_VZ)
        .union(Self::IGNORE_AFX)
        .union(Self::IGNORE_AFY)
        .union(Self::IGNORE_AFZ)
        .union(Self::FORCE);
}

/// Coordinate frame identifiers, numbered as `MAV_FRAME`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum SetpointFrame {
    BodyOffsetNed = 9,
}

/// The single target the autopilot is asked to track.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TargetSetpoint {
    /// Target position in the navigation frame [m]
    pub position: Vector3<f32>,
    /// Target heading [rad]
    pub yaw: f32,
    /// Maximum rate at which to turn towards `yaw` [rad/s]
    pub yaw_rate: f32,
    pub mask: ControlMask,
    pub frame: SetpointFrame,
}

impl TargetSetpoint {
    /// The frame every setpoint is stamped with, independent of how the
    /// position was computed.
    pub const FRAME: SetpointFrame = SetpointFrame::BodyOffsetNed;

    pub fn construct(x: f32, y: f32, z: f32, yaw: f32) -> Self {
        Self::from_position(Vector3::new(x, y, z), yaw)
    }

    pub fn from_position(position: Vector3<f32>, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            yaw_rate: DEFAULT_YAW_RATE,
            mask: ControlMask::POSITION_YAW,
            frame: Self::FRAME,
        }
    }

    pub fn with_yaw_rate(mut self, yaw_rate: f32) -> Self {
        self.yaw_rate = yaw_rate;
        self
    }

    /// True when the summed absolute per-axis distance between the pose
    /// and this target is below `threshold`.
    pub fn within(&self, pose: &Pose, threshold: f32) -> bool {
        (pose.position - self.position).lp_norm(1) < threshold
    }
}

impl Default for TargetSetpoint {
    fn default() -> Self {
        Self::construct(0.0, 0.0, 0.0, 0.0)
    }
}

/// A setpoint as it leaves the publish loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StampedSetpoint {
    pub stamp: Instant,
    pub setpoint: TargetSetpoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_yaw_mask() {
        assert_eq!(ControlMask::POSITION_YAW.bits(), 8 + 16 + 32 + 64 + 128 + 256 + 512);
        assert!(!ControlMask::POSITION_YAW.contains(ControlMask::IGNORE_PX));
        assert!(!ControlMask::POSITION_YAW.contains(ControlMask::IGNORE_YAW));
        assert!(!ControlMask::POSITION_YAW.contains(ControlMask::IGNORE_YAW_RATE));
    }

    #[test]
    fn construct_defaults() {
        let sp = TargetSetpoint::construct(1.0, 2.0, 3.0, 0.5);
        assert_eq!(sp.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(sp.yaw, 0.5);
        assert_eq!(sp.yaw_rate, 1.0);
        assert_eq!(sp.mask, ControlMask::POSITION_YAW);
        assert_eq!(u8::from(sp.frame), 9);
    }

    #[test]
    fn within_uses_summed_deltas() {
        let sp = TargetSetpoint::construct(1.0, 1.0, 1.0, 0.0);

        assert!(sp.within(&Pose::at(1.0, 1.0, 1.0), 0.1));
        assert!(sp.within(&Pose::at(1.03, 0.97, 1.03), 0.1));

        // Each axis is inside the threshold, but the sum is not
        assert!(!sp.within(&Pose::at(1.05, 0.95, 1.05), 0.1));
    }
}
