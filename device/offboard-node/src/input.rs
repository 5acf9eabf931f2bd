//! Line based stand-in for the gesture recognizer and position streams.
//!
//! Every line of standard input is one of:
//! - a command token, e.g. `Takeoff` or `Forward`
//! - `pos <frame_id> <x> <y> <z>`, a position request
//! - `yaw <degrees>`, a yaw request
//! - `Quit`, which shuts the node down

use common::{
    nalgebra::Vector3,
    tasks::commander::{PositionRequest, Request},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Request(Request),
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();

    let Some(first) = words.next() else {
        return Ok(Input::Empty);
    };

    let args: Vec<&str> = words.collect();

    match (first, args.as_slice()) {
        ("Quit", []) => Ok(Input::Quit),
        ("yaw", &[degrees]) => Ok(Input::Request(Request::Yaw {
            degrees: number(degrees)?,
        })),
        ("pos", &[frame_id, x, y, z]) => {
            let position = Vector3::new(number(x)?, number(y)?, number(z)?);
            Ok(Input::Request(PositionRequest::new(position, frame_id).into()))
        }
        ("yaw" | "pos", _) => Err(format!("wrong number of arguments for `{first}`")),
        // Tokens are passed on as-is, the commander decides what is supported
        _ => Ok(Input::Request(Request::Token(line.trim().into()))),
    }
}

fn number(word: &str) -> Result<f32, String> {
    word.parse()
        .map_err(|e| format!("invalid number `{word}`: {e}"))
}
