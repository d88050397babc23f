//! Refresh scheduler.
//!
//! Runs the first cycle immediately, then sleeps the refresh interval
//! after each cycle completes. Stops when the shutdown future resolves
//! (Ctrl+C in the binary) or after `max_cycles` cycles.

use std::future::Future;
use std::io;
use std::time::Duration;
use tracing::{error, info};

use crate::types::CycleReport;

/// Why the scheduler returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxCycles,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub cycles_run: u64,
    pub stopped_by: StopReason,
}

pub struct RefreshScheduler {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl RefreshScheduler {
    pub fn new(interval: Duration, max_cycles: Option<u64>) -> Self {
        Self { interval, max_cycles }
    }

    fn reached_limit(&self, cycles_run: u64) -> bool {
        self.max_cycles.is_some_and(|max| cycles_run >= max)
    }

    /// Drive `cycle` until a stop condition is met.
    ///
    /// `cycle` receives the 1-based cycle number. A cycle in progress is
    /// abandoned at its next await point if shutdown fires.
    pub async fn run<F, Fut, S>(&self, mut cycle: F, shutdown: S) -> SchedulerSummary
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = CycleReport>,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles_run = 0;

        loop {
            if self.reached_limit(cycles_run) {
                return self.stop(cycles_run, StopReason::MaxCycles);
            }

            tokio::select! {
                report = cycle(cycles_run + 1) => {
                    cycles_run += 1;
                    log_cycle_report(&report);
                }
                _ = &mut shutdown => {
                    return self.stop(cycles_run, StopReason::Shutdown);
                }
            }

            if self.reached_limit(cycles_run) {
                return self.stop(cycles_run, StopReason::MaxCycles);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    return self.stop(cycles_run, StopReason::Shutdown);
                }
            }
        }
    }

    fn stop(&self, cycles_run: u64, stopped_by: StopReason) -> SchedulerSummary {
        info!(cycles = cycles_run, reason = ?stopped_by, "Refresh loop stopped");
        SchedulerSummary { cycles_run, stopped_by }
    }
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        coins = report.coins_fetched,
        status = %report.status,
        "{report}"
    );
}

/// Resolve once `signal` fires.
///
/// If the signal handler cannot be installed the error is logged and the
/// returned future never resolves, so only `max_cycles` can stop the loop.
pub async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received."),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
