use cycle_sync::Dispatch::{CycleDriver, Dispatcher, DriverConfig, SlotId, UnitResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_pool(workers: usize, counter: &Arc<AtomicUsize>) -> Dispatcher {
    let mut dispatcher = Dispatcher::builder().with_thread_name("driver-test").build();
    for _ in 0..workers {
        let counter = Arc::clone(counter);
        dispatcher
            .register_worker(move |_: SlotId| -> UnitResult {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
            .unwrap();
    }
    dispatcher
}

#[test]
fn runs_the_configured_number_of_cycles() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = counting_pool(4, &counter);

    let driver = CycleDriver::new(
        DriverConfig::new()
            .with_cycles(50)
            .with_report_every(10)
            .with_pause_jitter(Duration::from_micros(100)),
    );
    let report = driver.run(&mut dispatcher);

    assert_eq!(report.cycles, 50);
    assert_eq!(report.failed_cycles, 0);
    assert!(!report.interrupted);
    assert!(report.min <= report.mean() && report.mean() <= report.max);
    assert_eq!(counter.load(Ordering::Relaxed), 200);
    assert_eq!(dispatcher.cycles_run(), 50);
}

#[test]
fn cleared_keep_alive_runs_nothing() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = counting_pool(2, &counter);

    let driver = CycleDriver::new(DriverConfig::new().with_cycles(10));
    driver.keep_alive().store(false, Ordering::Release);
    let report = driver.run(&mut dispatcher);

    assert_eq!(report.cycles, 0);
    assert_eq!(report.mean(), Duration::ZERO);
    assert_eq!(counter.load(Ordering::Relaxed), 0);
}

#[test]
fn keep_alive_cleared_by_a_unit_stops_after_that_cycle() {
    let driver = CycleDriver::new(
        DriverConfig::new()
            .with_cycles(1_000)
            .with_pause_jitter(Duration::ZERO),
    );
    let keep_alive = Arc::clone(driver.keep_alive());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut dispatcher = Dispatcher::new();
    let seen = Arc::clone(&calls);
    dispatcher
        .register_worker(move |_: SlotId| -> UnitResult {
            if seen.fetch_add(1, Ordering::SeqCst) + 1 == 5 {
                keep_alive.store(false, Ordering::Release);
            }
            Ok(())
        })
        .unwrap();

    let report = driver.run(&mut dispatcher);
    assert_eq!(report.cycles, 5);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn counts_cycles_with_failures() {
    let mut dispatcher = Dispatcher::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    dispatcher
        .register_worker(move |_: SlotId| -> UnitResult {
            // Every other cycle fails
            if seen.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                return Err("odd cycle".into());
            }
            Ok(())
        })
        .unwrap();

    let driver = CycleDriver::new(
        DriverConfig::new()
            .with_cycles(10)
            .with_pause_jitter(Duration::ZERO),
    );
    let report = driver.run(&mut dispatcher);
    assert_eq!(report.cycles, 10);
    assert_eq!(report.failed_cycles, 5);
}

#[test]
fn external_shutdown_ends_the_run_as_interrupted() {
    let mut dispatcher = Dispatcher::new();
    let handle = dispatcher.shutdown_handle();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    dispatcher
        .register_worker(move |_: SlotId| -> UnitResult {
            if seen.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                handle.trigger();
            }
            Ok(())
        })
        .unwrap();

    let driver = CycleDriver::new(
        DriverConfig::new()
            .with_cycles(100)
            .with_pause_jitter(Duration::ZERO),
    );
    let report = driver.run(&mut dispatcher);

    assert!(report.interrupted);
    // The triggering cycle counts only if its unit reported before the
    // coordinator observed the flag
    assert!((2..=3).contains(&report.cycles), "{report:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    dispatcher.shutdown();
}
