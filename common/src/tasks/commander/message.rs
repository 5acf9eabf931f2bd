use core::str::FromStr;

use nalgebra::Vector3;

use crate::{errors::OffboardError, frames::FrameTag};

/// Discrete commands, as produced by the gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Arm,
    Disarm,
    /// Switch the autopilot into its offboard mode
    Offboard,
    /// Hold the current position and heading
    Hover,
    Takeoff,
    Land,
    /// Step along one body axis
    Move(Direction),
}

/// Body-relative direction of a [`Command::Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl FromStr for Command {
    type Err = OffboardError;

    /// Parse a command token. Matching is exact and case sensitive.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Ok(match token {
            "Arm" => Command::Arm,
            "Disarm" => Command::Disarm,
            "Offboard" => Command::Offboard,
            "Hover" => Command::Hover,
            "Takeoff" => Command::Takeoff,
            "Land" => Command::Land,
            "Forward" => Command::Move(Direction::Forward),
            "Backward" => Command::Move(Direction::Backward),
            "Left" => Command::Move(Direction::Left),
            "Right" => Command::Move(Direction::Right),
            "Up" => Command::Move(Direction::Up),
            "Down" => Command::Move(Direction::Down),
            other => return Err(OffboardError::UnsupportedCommand(other.into())),
        })
    }
}

/// A position request from the external position stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRequest {
    pub position: Vector3<f32>,
    /// Frame id of the request, classified against the body frame id
    pub frame_id: String,
}

impl PositionRequest {
    pub fn new(position: Vector3<f32>, frame_id: impl Into<String>) -> Self {
        Self {
            position,
            frame_id: frame_id.into(),
        }
    }

    pub fn frame_tag(&self, body_frame_id: &str) -> FrameTag {
        FrameTag::from_frame_id(&self.frame_id, body_frame_id)
    }
}

/// A request to the [`Commander`](super::Commander)
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Raw command token, parsed by the commander
    Token(String),
    Command(Command),
    Position(PositionRequest),
    /// Absolute heading request, in degrees
    Yaw { degrees: f32 },
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        Request::Command(command)
    }
}

impl From<PositionRequest> for Request {
    fn from(request: PositionRequest) -> Self {
        Request::Position(request)
    }
}

/// The response to a request to the [`Commander`](super::Commander)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The request named an unsupported command
    Unsupported,

    /// Some necessary telemetry is not available
    Unavailable,

    /// The command would have no effect on the system
    Unchanged,

    /// The command was accepted and processed appropriately
    Accepted,

    /// The command was rejected due to the current state of the vehicle
    Rejected,

    /// An autopilot service call failed
    Failed,
}
