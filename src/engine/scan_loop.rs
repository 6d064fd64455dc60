//! Repeated scanning on a fixed interval.
//!
//! The loop alternates between scanning and idling until the supplied
//! shutdown future resolves. Shutdown is honoured both during the idle
//! sleep and while a scan is in flight; an interrupted scan is dropped
//! without being reported.

use chrono::Utc;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::scanner::ScanEngine;
use crate::types::{CycleReport, RouteReason};

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

/// Receives every completed cycle.
pub trait ScanReporter: Send {
    fn report(&mut self, report: &CycleReport);
}

impl<F> ScanReporter for F
where
    F: FnMut(&CycleReport) + Send,
{
    fn report(&mut self, report: &CycleReport) {
        self(report)
    }
}

/// Default reporter: one log line per route, then a cycle summary.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ScanReporter for LogReporter {
    fn report(&mut self, report: &CycleReport) {
        for result in &report.results {
            info!(cycle = report.cycle, "{result}");
        }

        let best = report
            .best_executable()
            .map(|r| format!("{} -> {} (+{})", r.buy_venue, r.sell_venue, r.profit));

        info!(
            cycle = report.cycle,
            routes = report.results.len(),
            executable = report.count(RouteReason::Executable),
            below_threshold = report.count(RouteReason::BelowThreshold),
            no_route = report.count(RouteReason::NoRoute),
            best = best.as_deref().unwrap_or("none"),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Cycle complete"
        );
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

pub struct ScanLoop {
    engine: ScanEngine,
    interval: Duration,
}

impl ScanLoop {
    /// Idle time between cycles comes from the engine's configuration.
    pub fn new(engine: ScanEngine) -> Self {
        let interval = engine.config().poll_interval;
        Self { engine, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single numbered cycle.
    pub async fn run_cycle(&self, cycle: u64) -> CycleReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        debug!(cycle, "Scanning");

        let results = self.engine.scan_once().await;

        CycleReport {
            cycle,
            started_at,
            elapsed: clock.elapsed(),
            results,
        }
    }

    /// Scan, report, sleep, repeat until `shutdown` resolves.
    ///
    /// Returns the number of cycles that completed and were reported.
    pub async fn run<R, S>(&self, reporter: &mut R, shutdown: S) -> u64
    where
        R: ScanReporter + ?Sized,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut completed = 0u64;

        info!(
            interval_ms = self.interval.as_millis() as u64,
            venues = self.engine.config().venues.len(),
            "Scan loop started"
        );

        loop {
            let report = tokio::select! {
                report = self.run_cycle(completed + 1) => report,
                _ = &mut shutdown => {
                    info!(completed, "Shutdown during scan, cycle abandoned");
                    return completed;
                }
            };

            reporter.report(&report);
            completed += 1;

            debug!(cycle = completed, "Idle");
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    info!(completed, "Shutdown while idle");
                    return completed;
                }
            }
        }
    }
}
