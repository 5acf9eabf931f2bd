//! The boundary between the core and the autopilot bridge.
//!
//! Implementors own the transport, the core only ever sees these traits.

use crate::types::setpoint::StampedSetpoint;

/// Arm and mode services of the autopilot. Both return whether the
/// autopilot accepted the request.
#[allow(async_fn_in_trait)]
pub trait AutopilotServices {
    async fn set_armed(&mut self, arm: bool) -> bool;
    async fn set_mode(&mut self, mode: &str) -> bool;
}

/// Outbound setpoint channel.
#[allow(async_fn_in_trait)]
pub trait SetpointSink {
    async fn send_setpoint(&mut self, setpoint: StampedSetpoint);
}

impl<T: AutopilotServices> AutopilotServices for &mut T {
    async fn set_armed(&mut self, arm: bool) -> bool {
        (**self).set_armed(arm).await
    }

    async fn set_mode(&mut self, mode: &str) -> bool {
        (**self).set_mode(mode).await
    }
}

impl<T: SetpointSink> SetpointSink for &mut T {
    async fn send_setpoint(&mut self, setpoint: StampedSetpoint) {
        (**self).send_setpoint(setpoint).await
    }
}
