use mutex::{raw_impls::cs::CriticalSectionRawMutex as M, BlockingMutex};

use crate::types::setpoint::TargetSetpoint;

/// Holder of the current target. Unlike the telemetry watches this is never
/// empty, it is created with a valid setpoint and only ever swapped whole.
pub struct SetpointStore {
    inner: BlockingMutex<M, TargetSetpoint>,
}

impl SetpointStore {
    pub const fn new(initial: TargetSetpoint) -> Self {
        Self {
            inner: BlockingMutex::new(initial),
        }
    }

    /// Copy of the current target.
    pub fn current(&self) -> TargetSetpoint {
        self.inner.with_lock(|target| *target)
    }

    /// Atomically replace the target, returning the previous one.
    pub fn replace(&self, target: TargetSetpoint) -> TargetSetpoint {
        self.inner
            .with_lock(|current| core::mem::replace(current, target))
    }
}
