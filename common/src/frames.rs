//! Heading extraction and the two position request transforms.
//!
//! A position request is either a body-relative offset (forward, left, up),
//! which is rotated by the current heading and added to the current position,
//! or a navigation-frame position whose axes are relabelled without any rotation
//! and without adding the current position.

use core::f32::consts::PI;

use nalgebra::{Rotation2, UnitQuaternion, Vector2, Vector3};

/// Which transform a position request is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTag {
    /// Forward/left/up offset relative to the vehicle body.
    BodyRelative,
    /// Absolute position, axis-remapped into the navigation frame.
    NavigationAbsolute,
}

impl FrameTag {
    /// Classify the frame id of a request. Only an exact match on the body
    /// frame id selects the body-relative path, anything else (including an
    /// empty or unknown id) falls back to the navigation-frame path.
    pub fn from_frame_id(frame_id: &str, body_frame_id: &str) -> Self {
        if frame_id == body_frame_id {
            FrameTag::BodyRelative
        } else {
            FrameTag::NavigationAbsolute
        }
    }
}

/// Yaw about the vertical axis from a unit quaternion, in `(-π, π]`.
///
/// `yaw = atan2(2(wz + xy), 1 - 2(y² + z²))`
pub fn heading_from_quaternion(q: &UnitQuaternion<f32>) -> f32 {
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);
    let yaw = f32::atan2(2.0 * (w * z + x * y), 1.0 - 2.0 * (y * y + z * z));

    // atan2 may produce exactly -π, which belongs to the other end of the range
    if yaw <= -PI {
        PI
    } else {
        yaw
    }
}

/// Rotate a forward/left/up body offset into a navigation-frame offset.
pub fn body_offset_to_nav(offset: &Vector3<f32>, heading: f32) -> Vector3<f32> {
    let horizontal = Rotation2::new(heading) * Vector2::new(offset.x, offset.y);
    Vector3::new(horizontal.x, horizontal.y, offset.z)
}

/// Relabel the axes of a navigation-frame request: `(x, y, z) -> (y, -x, z)`.
pub fn remap_nav_absolute(input: &Vector3<f32>) -> Vector3<f32> {
    Vector3::new(input.y, -input.x, input.z)
}

/// Compute the absolute target position of a position request.
///
/// `position` and `heading` must come from the same telemetry snapshot.
pub fn target_position(
    tag: FrameTag,
    input: &Vector3<f32>,
    position: &Vector3<f32>,
    heading: f32,
) -> Vector3<f32> {
    match tag {
        FrameTag::BodyRelative => position + body_offset_to_nav(input, heading),
        FrameTag::NavigationAbsolute => remap_nav_absolute(input),
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn identity_has_zero_heading() {
        assert_eq!(heading_from_quaternion(&UnitQuaternion::identity()), 0.0);
    }

    #[test]
    fn heading_follows_yaw_rotation() {
        for deg in (-179..=179).step_by(7) {
            let yaw = (deg as f32).to_radians();
            let q = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
            assert_relative_eq!(heading_from_quaternion(&q), yaw, epsilon = 1e-5);
        }
    }

    #[test]
    fn heading_ignores_roll_and_pitch() {
        let q = UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1);
        assert_relative_eq!(heading_from_quaternion(&q), 1.1, epsilon = 1e-5);
    }

    #[test]
    fn heading_stays_in_range() {
        let steps = [-3.0, -1.5, -0.7, 0.0, 0.4, 1.2, 2.9];
        for roll in steps {
            for pitch in steps.map(|a| a / 2.0) {
                for yaw in steps.iter().copied().chain([PI, -PI]) {
                    let q = UnitQuaternion::from_euler_angles(roll, pitch, yaw);
                    let heading = heading_from_quaternion(&q);
                    assert!(heading > -PI && heading <= PI, "{heading} out of range");
                }
            }
        }
    }

    #[test]
    fn half_turn_maps_to_positive_pi() {
        // Built by hand so that atan2 sees (-0.0, -1.0) and returns exactly -π
        let q = UnitQuaternion::new_unchecked(nalgebra::Quaternion::new(0.0, -0.0, 0.0, -1.0));
        assert_eq!(heading_from_quaternion(&q), PI);
    }

    #[test]
    fn body_offset_at_zero_heading() {
        let delta = body_offset_to_nav(&Vector3::new(1.0, 0.0, 0.0), 0.0);
        assert_eq!(delta, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn body_offset_at_quarter_turn() {
        let delta = body_offset_to_nav(&Vector3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(delta, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);

        let delta = body_offset_to_nav(&Vector3::new(0.0, 1.0, 0.5), FRAC_PI_2);
        assert_relative_eq!(delta, Vector3::new(-1.0, 0.0, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn body_relative_adds_current_position() {
        let position = Vector3::new(2.0, 3.0, 1.0);
        let target = target_position(
            FrameTag::BodyRelative,
            &Vector3::new(1.0, 0.0, 0.5),
            &position,
            0.0,
        );
        assert_eq!(target, Vector3::new(3.0, 3.0, 1.5));
    }

    #[test]
    fn navigation_path_remaps_without_position() {
        let position = Vector3::new(2.0, 3.0, 1.0);
        let target = target_position(
            FrameTag::NavigationAbsolute,
            &Vector3::new(1.0, 2.0, 3.0),
            &position,
            FRAC_PI_2,
        );
        assert_eq!(target, Vector3::new(2.0, -1.0, 3.0));
    }

    #[test]
    fn unknown_frame_ids_use_navigation_path() {
        assert_eq!(FrameTag::from_frame_id("base_link", "base_link"), FrameTag::BodyRelative);
        assert_eq!(FrameTag::from_frame_id("map", "base_link"), FrameTag::NavigationAbsolute);
        assert_eq!(FrameTag::from_frame_id("", "base_link"), FrameTag::NavigationAbsolute);
        assert_eq!(FrameTag::from_frame_id("Base_Link", "base_link"), FrameTag::NavigationAbsolute);
    }
}
