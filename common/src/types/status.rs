use crate::frames::FrameTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateBlocker(u8);

bitflags::bitflags! {
    /// The reasons why a gated command may currently not act on the target.
    /// The flag is `0x00` when every predicate holds, which can be checked
    /// with the `is_empty()` method.
    impl GateBlocker: u8 {

        /// **Bit 0** - The vehicle is not armed.
        const DISARMED      = 1 << 0;

        /// **Bit 1** - The autopilot is not accepting offboard setpoints.
        const NOT_OFFBOARD  = 1 << 1;

        /// **Bit 2** - The vehicle is at or below the airborne altitude.
        const GROUNDED      = 1 << 2;

        /// **Bit 3** - No pose sample has been received yet.
        const NO_POSE       = 1 << 3;
    }
}

/// Gate predicates, evaluated from a single telemetry snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateState {
    pub armed: bool,
    pub offboard: bool,
    pub airborne: bool,
}

impl GateState {
    /// Armed and offboard, the precondition for `Takeoff` and `Land`.
    pub fn engaged(&self) -> bool {
        self.armed && self.offboard
    }
}

/// Observability snapshot emitted by the publish loop on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub armed: bool,
    pub offboard: bool,
    pub airborne: bool,
    /// Whether the vehicle is within the arrival threshold of the target
    pub arrived: bool,
    /// Transform used by the most recent position request, if any
    pub last_frame: Option<FrameTag>,
}
