pub mod measurements;
pub mod setpoint;
pub mod status;
