use super::Dispatcher;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Cycles to run before returning.
    pub cycles: u64,
    /// Log progress every this many cycles; 0 disables progress lines.
    pub report_every: u64,
    /// Upper bound of the random pause between cycles; zero means back to back.
    pub pause_jitter: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            cycles: 500,
            report_every: 100,
            pause_jitter: Duration::from_millis(2),
        }
    }
}

impl DriverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycles(mut self, cycles: u64) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_report_every(mut self, every: u64) -> Self {
        self.report_every = every;
        self
    }

    pub fn with_pause_jitter(mut self, jitter: Duration) -> Self {
        self.pause_jitter = jitter;
        self
    }
}

/// Latency summary of a driver run. Latencies cover `run_cycle` only, from
/// just before arming to its return; pauses between cycles are excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    /// Cycles that completed (failed units included, interrupted excluded).
    pub cycles: u64,
    /// Completed cycles with at least one failed slot.
    pub failed_cycles: u64,
    /// The run ended because the dispatcher was shut down mid-way.
    pub interrupted: bool,
    pub total: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl DriverReport {
    pub fn mean(&self) -> Duration {
        if self.cycles == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.total.as_nanos() / self.cycles as u128) as u64)
    }

    fn record(&mut self, latency: Duration) {
        self.min = if self.cycles == 0 {
            latency
        } else {
            self.min.min(latency)
        };
        self.max = self.max.max(latency);
        self.total += latency;
        self.cycles += 1;
    }
}

/// Caller-side loop around [`Dispatcher::run_cycle`].
pub struct CycleDriver {
    config: DriverConfig,
    keep_alive: Arc<AtomicBool>,
}

impl CycleDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            keep_alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag checked before every cycle; storing `false` stops the run after
    /// the cycle in flight.
    pub fn keep_alive(&self) -> &Arc<AtomicBool> {
        &self.keep_alive
    }

    pub fn run(&self, dispatcher: &mut Dispatcher) -> DriverReport {
        let mut report = DriverReport::default();
        let jitter_ns = self.config.pause_jitter.as_nanos() as u64;

        for _ in 0..self.config.cycles {
            if !self.keep_alive.load(Ordering::Acquire) {
                break;
            }

            let start = Instant::now();
            let result = dispatcher.run_cycle();
            let latency = start.elapsed();

            if result.interrupted {
                report.interrupted = true;
                break;
            }
            if !result.failed_slots.is_empty() {
                report.failed_cycles += 1;
            }
            report.record(latency);

            if self.config.report_every > 0 && report.cycles % self.config.report_every == 0 {
                info!(
                    cycle = report.cycles,
                    mean_us = report.mean().as_micros() as u64,
                    "CYCLE"
                );
            }

            if jitter_ns > 0 {
                std::thread::sleep(Duration::from_nanos(fastrand::u64(0..jitter_ns)));
            }
        }

        info!(
            cycles = report.cycles,
            failed_cycles = report.failed_cycles,
            mean_us = report.mean().as_micros() as u64,
            max_us = report.max.as_micros() as u64,
            "AVERAGE TIME"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tracks_min_max_mean() {
        let mut report = DriverReport::default();
        report.record(Duration::from_micros(30));
        report.record(Duration::from_micros(10));
        report.record(Duration::from_micros(20));

        assert_eq!(report.cycles, 3);
        assert_eq!(report.min, Duration::from_micros(10));
        assert_eq!(report.max, Duration::from_micros(30));
        assert_eq!(report.mean(), Duration::from_micros(20));
    }

    #[test]
    fn empty_report_has_zero_mean() {
        assert_eq!(DriverReport::default().mean(), Duration::ZERO);
    }
}
