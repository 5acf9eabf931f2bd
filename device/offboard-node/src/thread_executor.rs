use embassy_executor::Executor;
use embassy_executor::SendSpawner;
use std::sync::mpsc;

/// Start an embassy executor on a new named thread and return its spawner.
pub fn new_spawner(name: &str) -> Result<SendSpawner, Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();

    _ = std::thread::Builder::new().name(name.into()).spawn(move || {
        // The executor runs for the rest of the process lifetime
        let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
        executor.run(|spawner| {
            // The receiving end only goes away if startup already failed
            _ = tx.send(spawner.make_send());
        });
    })?;

    Ok(rx.recv()?)
}
