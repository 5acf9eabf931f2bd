use std::time::Duration;

use common::signals::FlightControlState;
use common::sync::shutdown::Shutdown;
use common::tasks::{commander::Commander, publisher::Publisher};
use mutex::raw_impls::cs::CriticalSectionRawMutex as M;
use offboard_sim::{Sim as _, SimHandle, SimulatedServices, SimulatedSink, SimulatedTelemetry};
use tokio::io::AsyncBufReadExt;
use tokio::runtime::Runtime;

use crate::input::{parse_line, Input};

pub fn setup_logging(level: log::LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .format_timestamp_nanos()
        .parse_default_env()
        .init();
}

#[embassy_executor::task]
pub async fn publisher(
    state: &'static FlightControlState,
    sink: SimulatedSink,
    shutdown: &'static Shutdown<M>,
) {
    Publisher::new(state, sink).run(shutdown).await
}

#[embassy_executor::task]
pub async fn commander(
    state: &'static FlightControlState,
    services: SimulatedServices,
    shutdown: &'static Shutdown<M>,
) {
    Commander::new(state, services)
        .run(&state.requests, shutdown)
        .await
}

pub(crate) fn simulation_runner(runtime: &Runtime, sim: SimHandle, frequency: f32, shutdown: &'static Shutdown<M>) {
    runtime.spawn(async move {
        let dt = 1.0 / frequency;
        let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
        while !shutdown.is_triggered() {
            sim.step(dt);
            interval.tick().await;
        }
    });
}

pub(crate) fn telemetry_runner(
    runtime: &Runtime,
    mut telemetry: SimulatedTelemetry,
    state: &'static FlightControlState,
    frequency: f32,
    shutdown: &'static Shutdown<M>,
) {
    runtime.spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(1.0 / frequency));
        while !shutdown.is_triggered() {
            telemetry.publish(&state.telemetry);
            interval.tick().await;
        }
    });
}

/// Forward stdin lines to the commander. Shuts the node down on `Quit`
/// or when stdin is closed.
pub(crate) fn gesture_reader(
    runtime: &Runtime,
    state: &'static FlightControlState,
    shutdown: &'static Shutdown<M>,
) {
    runtime.spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    log::info!("[input] End of input");
                    break;
                }
                Err(error) => {
                    log::error!("[input] Failed to read input: {}", error);
                    break;
                }
            };

            match parse_line(&line) {
                Ok(Input::Request(request)) => state.requests.send(request).await,
                Ok(Input::Quit) => break,
                Ok(Input::Empty) => (),
                Err(error) => log::warn!("[input] {}", error),
            }
        }

        shutdown.trigger();
    });
}
