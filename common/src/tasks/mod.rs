pub mod commander;
pub mod publisher;
pub mod safety_gate;
