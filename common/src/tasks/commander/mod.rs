//! Commander module
//!
//! Turns command tokens, position requests and yaw requests into a new
//! [`TargetSetpoint`]. Motion commands are checked against the
//! [`SafetyGate`] using a single telemetry snapshot, and either swap a
//! complete new target into the store or leave it untouched.

use embassy_futures::select::{select, Either};
use mutex::raw_impls::cs::CriticalSectionRawMutex as M;
use nalgebra::Vector3;

use crate::{
    errors::{OffboardError, Service},
    frames::{self, FrameTag},
    hw_abstraction::AutopilotServices,
    signals::{FlightControlState, RequestChannel, TelemetrySnapshot},
    sync::shutdown::Shutdown,
    tasks::safety_gate::SafetyGate,
    types::setpoint::TargetSetpoint,
};

pub mod message;
pub use message::{Command, Direction, PositionRequest, Request, Response};

pub struct Commander<'a, S> {
    name: &'static str,
    state: &'a FlightControlState,
    services: S,
    gate: SafetyGate,
}

impl<'a, S: AutopilotServices> Commander<'a, S> {
    pub fn new(state: &'a FlightControlState, services: S) -> Self {
        Self {
            name: "commander",
            state,
            services,
            gate: state.safety_gate(),
        }
    }

    /// Handle requests from the channel until shutdown is triggered.
    pub async fn run(&mut self, requests: &RequestChannel, shutdown: &Shutdown<M>) {
        trace!("[{}] Starting main loop", self.name);
        loop {
            match select(shutdown.wait(), requests.receive()).await {
                Either::First(()) => break,
                Either::Second(request) => {
                    let response = self.handle_request(request).await;
                    if response != Response::Unsupported {
                        trace!("[{}] Responded with {:?}", self.name, response);
                    }
                }
            }
        }
        info!("[{}] Stopped", self.name);
    }

    pub async fn handle_request(&mut self, request: Request) -> Response {
        match request {
            Request::Token(token) => self.handle_token(&token).await,
            Request::Command(command) => self.handle_command(command).await,
            Request::Position(request) => self.handle_position(&request),
            Request::Yaw { degrees } => self.handle_yaw(degrees),
        }
    }

    /// Parse and handle a raw command token. An unknown token produces
    /// exactly one error log entry and nothing else.
    pub async fn handle_token(&mut self, token: &str) -> Response {
        match token.parse::<Command>() {
            Ok(command) => self.handle_command(command).await,
            Err(error) => {
                error!("[{}] {}", self.name, error);
                Response::Unsupported
            }
        }
    }

    pub async fn handle_command(&mut self, command: Command) -> Response {
        match command {
            Command::Arm => {
                warn!("[{}] Arming", self.name);
                self.set_armed(true).await
            }
            Command::Disarm => {
                warn!("[{}] Disarming", self.name);
                self.set_armed(false).await
            }
            Command::Offboard => {
                warn!("[{}] Entering offboard mode", self.name);
                self.enter_offboard().await
            }
            Command::Hover => {
                warn!("[{}] Hovering", self.name);
                self.apply_motion(command)
            }
            Command::Takeoff => {
                warn!("[{}] Taking off", self.name);
                self.apply_motion(command)
            }
            Command::Land => {
                warn!("[{}] Landing", self.name);
                self.apply_motion(command)
            }
            Command::Move(direction) => {
                warn!("[{}] Moving {:?}", self.name, direction);
                self.apply_motion(command)
            }
        }
    }

    /// Handle a position request. Not gated, but needs telemetry.
    pub fn handle_position(&mut self, request: &PositionRequest) -> Response {
        let tag = request.frame_tag(&self.state.config().body_frame_id);
        info!("[{}] New position request in {:?} frame", self.name, tag);

        let snapshot = self.state.telemetry.snapshot();
        match self.position_target(tag, &request.position, &snapshot) {
            Ok(target) => {
                self.state.last_frame.send(tag);
                self.commit(target)
            }
            Err(error) => self.ignore(error),
        }
    }

    /// Handle a yaw request. Keeps the current position and turns to the
    /// requested absolute heading.
    pub fn handle_yaw(&mut self, degrees: f32) -> Response {
        info!("[{}] New yaw request: {} deg", self.name, degrees);

        let snapshot = self.state.telemetry.snapshot();
        match snapshot.pose() {
            Ok(pose) => self.commit(self.setpoint(pose.position, degrees.to_radians())),
            Err(error) => self.ignore(error),
        }
    }

    async fn set_armed(&mut self, arm: bool) -> Response {
        if self.services.set_armed(arm).await {
            self.state.telemetry.set_armed(arm);
            info!("[{}] Vehicle {}", self.name, if arm { "armed" } else { "disarmed" });
            Response::Accepted
        } else {
            let error = OffboardError::ServiceFailure {
                service: Service::Arming,
            };
            error!("[{}] {}", self.name, error);

            // Either way the vehicle is no longer considered armed, until the
            // next status sample says otherwise
            self.state.telemetry.set_armed(false);
            Response::Failed
        }
    }

    async fn enter_offboard(&mut self) -> Response {
        if self.services.set_mode(&self.state.config().offboard_mode).await {
            self.state.telemetry.set_offboard(true);
            info!("[{}] Offboard mode enabled", self.name);
            Response::Accepted
        } else {
            let error = OffboardError::ServiceFailure {
                service: Service::SetMode,
            };
            error!("[{}] {}", self.name, error);
            self.state.telemetry.set_offboard(false);
            Response::Failed
        }
    }

    /// Gate check and target computation for motion commands, all from a
    /// single telemetry snapshot.
    fn apply_motion(&mut self, command: Command) -> Response {
        let snapshot = self.state.telemetry.snapshot();

        if let Err(error) = snapshot.pose_and_heading() {
            return self.ignore(error);
        }

        let blocker = match command {
            Command::Takeoff | Command::Land => self.gate.engaged_blockers(&snapshot),
            _ => self.gate.blockers(&snapshot),
        };

        if !blocker.is_empty() {
            debug!("[{}] {:?} blocked by {:?}", self.name, command, blocker);
            return Response::Rejected;
        }

        if command == Command::Takeoff && self.gate.airborne(&snapshot) {
            warn!("[{}] Vehicle already took off", self.name);
            return Response::Unchanged;
        }

        match self.motion_target(command, &snapshot) {
            Ok(Some(target)) => self.commit(target),
            Ok(None) => Response::Unsupported,
            Err(error) => self.ignore(error),
        }
    }

    /// The target a motion command moves to. Deltas are applied to the
    /// current pose, never to the previous target.
    fn motion_target(
        &self,
        command: Command,
        snapshot: &TelemetrySnapshot,
    ) -> Result<Option<TargetSetpoint>, OffboardError> {
        let (pose, heading) = snapshot.pose_and_heading()?;
        let config = self.state.config();
        let mut position = pose.position;

        match command {
            Command::Hover => {}
            Command::Takeoff => position.z = config.takeoff_height,
            Command::Land => position.z = config.land_height,
            Command::Move(direction) => {
                position += match direction {
                    Direction::Forward => Vector3::x() * config.forward_step,
                    Direction::Backward => -Vector3::x() * config.forward_step,
                    Direction::Left => Vector3::y() * config.lateral_step,
                    Direction::Right => -Vector3::y() * config.lateral_step,
                    Direction::Up => Vector3::z() * config.vertical_step,
                    Direction::Down => -Vector3::z() * config.vertical_step,
                }
            }
            Command::Arm | Command::Disarm | Command::Offboard => return Ok(None),
        }

        Ok(Some(self.setpoint(position, heading)))
    }

    fn position_target(
        &self,
        tag: FrameTag,
        input: &Vector3<f32>,
        snapshot: &TelemetrySnapshot,
    ) -> Result<TargetSetpoint, OffboardError> {
        let heading = snapshot.heading()?;
        let position = match tag {
            FrameTag::BodyRelative => snapshot.pose()?.position,
            FrameTag::NavigationAbsolute => Vector3::zeros(),
        };

        let target = frames::target_position(tag, input, &position, heading);
        Ok(self.setpoint(target, heading))
    }

    fn setpoint(&self, position: Vector3<f32>, yaw: f32) -> TargetSetpoint {
        TargetSetpoint::from_position(position, yaw).with_yaw_rate(self.state.config().yaw_rate)
    }

    fn commit(&self, target: TargetSetpoint) -> Response {
        debug!("[{}] New target: {:?}", self.name, target);
        self.state.target.replace(target);
        Response::Accepted
    }

    fn ignore(&self, error: OffboardError) -> Response {
        warn!("[{}] Ignoring request: {}", self.name, error);
        Response::Unavailable
    }
}
