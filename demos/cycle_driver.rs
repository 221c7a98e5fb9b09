// In demos/cycle_driver.rs
//
// cargo run --example cycle_driver -- [cycles] [workers]
use cycle_sync::Dispatch::{CycleDriver, Dispatcher, DriverConfig, SlotId, UnitResult, WorkUnit};
use std::env;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Simulated step: sleeps a random 0..400us.
struct JitterStep {
    steps: u64,
}

impl WorkUnit for JitterStep {
    fn execute(&mut self, _slot: SlotId) -> UnitResult {
        std::thread::sleep(Duration::from_micros(fastrand::u64(0..400)));
        self.steps += 1;
        Ok(())
    }
}

fn main() -> cycle_sync::Result<()> {
    tracing_subscriber::fmt().with_thread_names(true).init();

    let args: Vec<String> = env::args().collect();
    let cycles: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(500);
    let workers: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(14);

    let mut dispatcher = Dispatcher::builder()
        .with_thread_name("step")
        .with_core_pinning(true)
        .build();
    for _ in 0..workers {
        dispatcher.register_worker(JitterStep { steps: 0 })?;
    }

    let driver = CycleDriver::new(DriverConfig::new().with_cycles(cycles));

    // Handle Ctrl+C: stop after the cycle in flight
    let keep_alive = Arc::clone(driver.keep_alive());
    ctrlc::set_handler(move || {
        keep_alive.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Driver: {} workers, up to {} cycles", workers, cycles);
    let report = driver.run(&mut dispatcher);
    dispatcher.shutdown();

    println!(
        "Driver: {} cycles ({} with failures), mean {:.2?}, min {:.2?}, max {:.2?}",
        report.cycles,
        report.failed_cycles,
        report.mean(),
        report.min,
        report.max
    );
    Ok(())
}
