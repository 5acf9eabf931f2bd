//! Gate predicates deciding whether a command may act on the target.

use crate::{
    signals::TelemetrySnapshot,
    types::status::{GateBlocker, GateState},
};

/// Blockers that must be clear for `Takeoff` and `Land`.
const ENGAGED_MASK: GateBlocker = GateBlocker::DISARMED.union(GateBlocker::NOT_OFFBOARD);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyGate {
    airborne_altitude: f32,
}

impl SafetyGate {
    pub const fn new(airborne_altitude: f32) -> Self {
        Self { airborne_altitude }
    }

    /// Every blocker currently active for the given snapshot. A missing pose
    /// blocks both as [`GateBlocker::NO_POSE`] and [`GateBlocker::GROUNDED`].
    pub fn blockers(&self, snapshot: &TelemetrySnapshot) -> GateBlocker {
        let mut blocker = GateBlocker::empty();

        blocker.set(GateBlocker::DISARMED, !snapshot.status.armed);
        blocker.set(GateBlocker::NOT_OFFBOARD, !snapshot.status.offboard);

        match snapshot.pose {
            Some(pose) => {
                blocker.set(GateBlocker::GROUNDED, pose.position.z <= self.airborne_altitude);
            }
            None => blocker.insert(GateBlocker::NO_POSE | GateBlocker::GROUNDED),
        }

        blocker
    }

    /// Blockers relevant for commands that need an engaged vehicle.
    pub fn engaged_blockers(&self, snapshot: &TelemetrySnapshot) -> GateBlocker {
        self.blockers(snapshot).intersection(ENGAGED_MASK)
    }

    /// Strictly above the airborne altitude, armed and in offboard mode.
    pub fn airborne(&self, snapshot: &TelemetrySnapshot) -> bool {
        self.blockers(snapshot).is_empty()
    }

    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> GateState {
        let blocker = self.blockers(snapshot);
        GateState {
            armed: !blocker.contains(GateBlocker::DISARMED),
            offboard: !blocker.contains(GateBlocker::NOT_OFFBOARD),
            airborne: blocker.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::measurements::{Pose, VehicleStatus};

    use super::*;

    fn snapshot(z: Option<f32>, armed: bool, offboard: bool) -> TelemetrySnapshot {
        TelemetrySnapshot {
            pose: z.map(|z| Pose::at(0.0, 0.0, z)),
            heading: Some(0.0),
            status: VehicleStatus::new(armed, offboard),
        }
    }

    #[test]
    fn airborne_requires_all_predicates() {
        let gate = SafetyGate::new(0.3);

        assert!(gate.airborne(&snapshot(Some(1.0), true, true)));
        assert!(!gate.airborne(&snapshot(Some(1.0), false, true)));
        assert!(!gate.airborne(&snapshot(Some(1.0), true, false)));
        assert!(!gate.airborne(&snapshot(Some(0.2), true, true)));
        assert!(!gate.airborne(&snapshot(None, true, true)));
    }

    #[test]
    fn airborne_threshold_is_strict() {
        let gate = SafetyGate::new(0.3);

        assert!(!gate.airborne(&snapshot(Some(0.3), true, true)));
        assert!(gate.airborne(&snapshot(Some(0.31), true, true)));
    }

    #[test]
    fn engaged_ignores_altitude() {
        let gate = SafetyGate::new(0.3);

        assert!(gate.engaged_blockers(&snapshot(Some(0.0), true, true)).is_empty());
        assert!(gate.engaged_blockers(&snapshot(None, true, true)).is_empty());
        assert_eq!(
            gate.engaged_blockers(&snapshot(Some(2.0), false, false)),
            GateBlocker::DISARMED | GateBlocker::NOT_OFFBOARD
        );
    }

    #[test]
    fn evaluate_reports_each_flag() {
        let gate = SafetyGate::new(0.3);

        let state = gate.evaluate(&snapshot(Some(0.1), true, false));
        assert_eq!(
            state,
            GateState {
                armed: true,
                offboard: false,
                airborne: false
            }
        );
        assert!(!state.engaged());

        let state = gate.evaluate(&snapshot(Some(1.0), true, true));
        assert!(state.engaged() && state.airborne);
    }
}
