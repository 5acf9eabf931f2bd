//! Fixed-rate setpoint stream.
//!
//! The autopilot drops out of offboard mode when setpoints stop arriving, so
//! the current target is resent on every tick whether or not it changed.

use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Ticker, Timer};
use mutex::raw_impls::cs::CriticalSectionRawMutex as M;

use crate::{
    hw_abstraction::SetpointSink,
    signals::FlightControlState,
    sync::shutdown::Shutdown,
    tasks::safety_gate::SafetyGate,
    types::{
        setpoint::{StampedSetpoint, TargetSetpoint},
        status::StatusSnapshot,
    },
};

pub struct Publisher<'a, K> {
    name: &'static str,
    state: &'a FlightControlState,
    sink: K,
    gate: SafetyGate,
    last_status: Option<StatusSnapshot>,
}

impl<'a, K: SetpointSink> Publisher<'a, K> {
    pub fn new(state: &'a FlightControlState, sink: K) -> Self {
        Self {
            name: "publisher",
            state,
            sink,
            gate: state.safety_gate(),
            last_status: None,
        }
    }

    /// Settle, then stream the target until shutdown is triggered.
    pub async fn run(&mut self, shutdown: &Shutdown<M>) {
        let config = self.state.config();
        info!("[{}] Settling before streaming setpoints", self.name);

        for delay in config.settle_delays() {
            if shutdown.run(Timer::after(delay)).await.is_none() {
                info!("[{}] Shutdown while settling", self.name);
                return;
            }
        }

        info!(
            "[{}] Streaming setpoints every {} ms",
            self.name,
            config.publish_period().as_millis()
        );

        // Deadline based, a slow tick does not shift the following ones
        let mut ticker = Ticker::every(config.publish_period());
        loop {
            match select(shutdown.wait(), ticker.next()).await {
                Either::First(()) => break,
                Either::Second(()) => {
                    self.tick().await;
                }
            }
        }

        info!("[{}] Stopped", self.name);
    }

    /// Send the current target with a fresh stamp, then refresh the status.
    pub async fn tick(&mut self) -> StampedSetpoint {
        let stamped = StampedSetpoint {
            stamp: Instant::now(),
            setpoint: self.state.target.current(),
        };

        self.sink.send_setpoint(stamped).await;
        self.update_status(&stamped.setpoint);

        stamped
    }

    fn update_status(&mut self, target: &TargetSetpoint) {
        let snapshot = self.state.telemetry.snapshot();
        let gate = self.gate.evaluate(&snapshot);
        let threshold = self.state.config().arrival_threshold;

        let status = StatusSnapshot {
            armed: gate.armed,
            offboard: gate.offboard,
            airborne: gate.airborne,
            arrived: snapshot.pose.is_some_and(|pose| target.within(&pose, threshold)),
            last_frame: self.state.last_frame.try_get(),
        };

        trace!("[{}] {:?}", self.name, status);
        if self.last_status != Some(status) {
            info!("[{}] Status changed: {:?}", self.name, status);
            self.last_status = Some(status);
        }

        self.state.status.send(status);
    }
}
