use nalgebra::{UnitQuaternion, Vector3};

use common::types::setpoint::TargetSetpoint;

/// Kinematic limits and autopilot behaviour of the simulated vehicle.
#[derive(Debug, Clone)]
pub struct VehicleParams {
    /// Maximum translational speed [m/s]
    pub max_speed: f32,
    /// Upper bound on the yaw rate, regardless of the setpoint [rad/s]
    pub max_yaw_rate: f32,
    /// Below this altitude the vehicle counts as landed [m]
    pub landed_altitude: f32,
    /// Offboard mode is left when no setpoint arrived for this long [s]
    pub stream_timeout: f32,
    /// Mode names the autopilot accepts
    pub modes: Vec<String>,
    /// Name of the mode that follows external setpoints
    pub offboard_mode: String,
    /// Mode entered when the setpoint stream stalls
    pub failsafe_mode: String,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            max_speed: 1.0,
            max_yaw_rate: 1.5,
            landed_altitude: 0.15,
            stream_timeout: 0.5,
            modes: ["MANUAL", "POSCTL", "OFFBOARD", "AUTO.LOITER", "AUTO.LAND"]
                .map(String::from)
                .to_vec(),
            offboard_mode: "OFFBOARD".into(),
            failsafe_mode: "AUTO.LOITER".into(),
        }
    }
}

/// The physical initial condition of the vehicle within a simulation.
#[derive(Debug, Clone, Default)]
pub struct Initial {
    pub position: Vector3<f32>,
    /// Initial heading [rad]
    pub yaw: f32,
}

/// The current state of the vehicle within the simulation.
#[derive(Debug, Clone)]
pub struct VehicleState {
    /// Position in the local navigation frame [m]
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    /// Velocity in the local navigation frame [m/s]
    pub velocity: Vector3<f32>,
    pub armed: bool,
    pub mode: String,
}

pub struct Simulation {
    pub(crate) state: VehicleState,
    params: VehicleParams,
    /// Simulated time since start [s]
    time: f32,
    setpoint: Option<TargetSetpoint>,
    last_setpoint_at: Option<f32>,
}

impl Simulation {
    pub fn new(params: VehicleParams, initial: Initial) -> Self {
        let mode = params
            .modes
            .first()
            .cloned()
            .unwrap_or_else(|| "MANUAL".into());

        Simulation {
            state: VehicleState {
                position: initial.position,
                rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, initial.yaw),
                velocity: Vector3::zeros(),
                armed: false,
                mode,
            },
            params,
            time: 0.0,
            setpoint: None,
            last_setpoint_at: None,
        }
    }

    pub fn is_offboard(&self) -> bool {
        self.state.mode == self.params.offboard_mode
    }

    pub fn is_landed(&self) -> bool {
        self.state.position.z <= self.params.landed_altitude
    }

    /// Whether a setpoint arrived within the stream timeout.
    pub fn stream_alive(&self) -> bool {
        self.last_setpoint_at
            .is_some_and(|at| self.time - at <= self.params.stream_timeout)
    }

    pub fn push_setpoint(&mut self, setpoint: TargetSetpoint) {
        self.setpoint = Some(setpoint);
        self.last_setpoint_at = Some(self.time);
    }

    /// Arm or disarm. Disarming is refused while in the air.
    pub fn set_armed(&mut self, arm: bool) -> bool {
        if !arm && !self.is_landed() {
            log::warn!("[sim] Refusing to disarm in flight");
            return false;
        }

        if self.state.armed != arm {
            log::info!("[sim] Vehicle {}", if arm { "armed" } else { "disarmed" });
        }
        self.state.armed = arm;
        true
    }

    /// Switch mode. The offboard mode is only entered while setpoints
    /// are streaming.
    pub fn set_mode(&mut self, mode: &str) -> bool {
        if !self.params.modes.iter().any(|m| m == mode) {
            log::warn!("[sim] Unknown mode {}", mode);
            return false;
        }

        if mode == self.params.offboard_mode && !self.stream_alive() {
            log::warn!("[sim] Refusing {}, no setpoint stream", mode);
            return false;
        }

        log::info!("[sim] Mode changed to {}", mode);
        self.state.mode = mode.into();
        true
    }

    /// Move the simulation forward a single time step.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;

        if self.is_offboard() && !self.stream_alive() {
            log::warn!("[sim] Setpoint stream lost, entering {}", self.params.failsafe_mode);
            self.state.mode = self.params.failsafe_mode.clone();
        }

        let goal = match (self.state.armed, self.is_offboard(), self.setpoint) {
            (true, true, Some(setpoint)) => Some(setpoint),
            _ => None,
        };

        let velocity = match goal {
            Some(setpoint) => {
                self.turn_towards(setpoint.yaw, setpoint.yaw_rate, dt);
                let max_speed = self.params.max_speed;
                velocity_towards(self.state.position, setpoint.position, max_speed, dt)
            }
            // Hold position while armed, sink to the ground when disarmed
            None if self.state.armed => Vector3::zeros(),
            None => Vector3::new(0.0, 0.0, -self.params.max_speed),
        };

        self.state.velocity = velocity;
        self.state.position += velocity * dt;

        // The ground is at zero altitude
        if self.state.position.z < 0.0 {
            self.state.position.z = 0.0;
            self.state.velocity.z = 0.0;
        }
    }

    fn turn_towards(&mut self, yaw: f32, yaw_rate: f32, dt: f32) {
        let current = self.state.yaw();
        let rate = yaw_rate.abs().min(self.params.max_yaw_rate);

        let error = wrap_angle(yaw - current);
        let step = error.clamp(-rate * dt, rate * dt);

        self.state.rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, current + step);
    }
}

/// Velocity which reaches `goal` without exceeding `max_speed` or
/// overshooting within one step.
fn velocity_towards(from: Vector3<f32>, goal: Vector3<f32>, max_speed: f32, dt: f32) -> Vector3<f32> {
    let error = goal - from;
    let distance = error.norm();
    if distance <= f32::EPSILON || dt <= 0.0 {
        return Vector3::zeros();
    }

    let speed = (distance / dt).min(max_speed);
    error * (speed / distance)
}

/// Wrap an angle into `[-π, π)`.
fn wrap_angle(angle: f32) -> f32 {
    use core::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn armed_offboard() -> Simulation {
        let mut sim = Simulation::new(VehicleParams::default(), Initial::default());
        sim.push_setpoint(TargetSetpoint::default());
        assert!(sim.set_armed(true));
        assert!(sim.set_mode("OFFBOARD"));
        sim
    }

    #[test]
    fn offboard_requires_stream() {
        let mut sim = Simulation::new(VehicleParams::default(), Initial::default());
        assert!(!sim.set_mode("OFFBOARD"));

        sim.push_setpoint(TargetSetpoint::default());
        assert!(sim.set_mode("OFFBOARD"));
        assert!(sim.is_offboard());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut sim = Simulation::new(VehicleParams::default(), Initial::default());
        assert!(!sim.set_mode("ACRO"));
        assert_eq!(sim.state.mode, "MANUAL");
    }

    #[test]
    fn stalled_stream_leaves_offboard() {
        let mut sim = armed_offboard();

        for _ in 0..4 {
            sim.update(0.1);
        }
        assert!(sim.is_offboard());

        sim.update(0.2);
        assert!(!sim.is_offboard());
        assert_eq!(sim.state.mode, "AUTO.LOITER");
    }

    #[test]
    fn tracks_setpoint_with_bounded_speed() {
        let mut sim = armed_offboard();
        let target = TargetSetpoint::construct(0.0, 0.0, 2.0, 0.0);

        for _ in 0..10 {
            sim.push_setpoint(target);
            sim.update(0.1);
            assert!(sim.state.velocity.norm() <= 1.0 + 1e-5);
        }
        assert_relative_eq!(sim.state.position.z, 1.0, epsilon = 1e-4);

        for _ in 0..20 {
            sim.push_setpoint(target);
            sim.update(0.1);
        }
        assert_relative_eq!(sim.state.position, target.position, epsilon = 1e-4);
    }

    #[test]
    fn turns_towards_setpoint_yaw() {
        let mut sim = armed_offboard();
        let target = TargetSetpoint::construct(0.0, 0.0, 0.0, 1.0).with_yaw_rate(0.5);

        for _ in 0..10 {
            sim.push_setpoint(target);
            sim.update(0.1);
        }
        assert_relative_eq!(sim.state.yaw(), 0.5, epsilon = 1e-4);

        for _ in 0..20 {
            sim.push_setpoint(target);
            sim.update(0.1);
        }
        assert_relative_eq!(sim.state.yaw(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn refuses_disarm_in_flight() {
        let mut sim = armed_offboard();
        sim.state.position.z = 1.0;

        assert!(!sim.set_armed(false));
        assert!(sim.state.armed);

        sim.state.position.z = 0.05;
        assert!(sim.set_armed(false));
    }

    #[test]
    fn disarmed_vehicle_sinks_to_ground() {
        let mut sim = Simulation::new(
            VehicleParams::default(),
            Initial {
                position: Vector3::new(0.0, 0.0, 0.5),
                yaw: 0.0,
            },
        );

        for _ in 0..10 {
            sim.update(0.1);
        }
        assert_eq!(sim.state.position.z, 0.0);
    }

    #[test]
    fn wraps_angles() {
        use core::f32::consts::{FRAC_PI_2, PI};

        assert_relative_eq!(wrap_angle(3.0 * PI / 2.0), -FRAC_PI_2, epsilon = 1e-6);
        assert_relative_eq!(wrap_angle(0.25), 0.25);
    }
}
