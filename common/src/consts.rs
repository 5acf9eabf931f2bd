/// Frame id on a position request which selects the body-relative transform.
pub const BODY_FRAME_ID: &str = "base_link";

/// Autopilot mode name requested by the `Offboard` command.
pub const OFFBOARD_MODE: &str = "OFFBOARD";

/// Yaw rate carried by constructed setpoints unless configured otherwise [rad/s]
pub const DEFAULT_YAW_RATE: f32 = 1.0;

/// Sum of absolute per-axis deltas below which a target counts as reached [m]
pub const ARRIVAL_THRESHOLD: f32 = 0.1;
