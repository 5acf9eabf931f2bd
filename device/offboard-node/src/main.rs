use std::time::Duration;

use clap::Parser;
use common::signals::FlightControlState;
use common::sync::shutdown::Shutdown;
use mutex::raw_impls::cs::CriticalSectionRawMutex as M;
use static_cell::StaticCell;

mod config;
mod input;
mod resources;
mod thread_executor;

#[derive(clap::Parser)]
struct Args {
    /// Path to the configuration file for the controller and simulation
    #[clap(default_value = "node_config.toml")]
    #[clap(short, long)]
    config: String,

    /// Log level, overridden by RUST_LOG when set
    #[clap(default_value = "info")]
    #[clap(short, long)]
    log_level: log::LevelFilter,
}

static STATE: StaticCell<FlightControlState> = StaticCell::new();
static SHUTDOWN: Shutdown<M> = Shutdown::new();

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    resources::setup_logging(args.log_level);

    // Load configuration
    let config = config::load_from_file_path(&args.config)?;
    let simulation_rate = config.sim.simulation.simulation_rate;
    let telemetry_rate = config.sim.simulation.telemetry_rate;
    let (r, sim) = offboard_sim::initialize(config.sim.into())?;

    let state: &'static FlightControlState = STATE.init(FlightControlState::new(config.controller));
    log::info!("[node] Starting with {:?}", state.config());

    // The simulator and the stdin reader live on the tokio runtime
    let runtime = tokio::runtime::Runtime::new()?;
    resources::simulation_runner(&runtime, sim, simulation_rate, &SHUTDOWN);
    resources::telemetry_runner(&runtime, r.telemetry, state, telemetry_rate, &SHUTDOWN);
    resources::gesture_reader(&runtime, state, &SHUTDOWN);

    // Create spawners for the threads
    let stream_spawner = thread_executor::new_spawner("setpoint-stream")?;
    let command_spawner = thread_executor::new_spawner("commander")?;

    stream_spawner
        .spawn(resources::publisher(state, r.sink, &SHUTDOWN))
        .map_err(|e| format!("Failed to spawn publisher: {e:?}"))?;
    command_spawner
        .spawn(resources::commander(state, r.services, &SHUTDOWN))
        .map_err(|e| format!("Failed to spawn commander: {e:?}"))?;

    // Park until shutdown, then give the tasks a moment to stop
    runtime.block_on(SHUTDOWN.wait());
    log::info!("[node] Shutting down");
    std::thread::sleep(Duration::from_millis(200));

    Ok(())
}
