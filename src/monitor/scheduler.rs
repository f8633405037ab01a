// Hourly health-check loop

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::monitor::{AlertLedger, AlertSink, StatusSource};

/// Periodic health check over all project services.
///
/// One sweep enumerates the services, parses each status, and pushes an
/// alert for every failed unit that has not been alerted in the current
/// alert day. Failures affecting one service degrade that entry only.
pub struct HealthMonitor<S, N> {
    source: S,
    sink: N,
    ledger: Arc<AlertLedger>,
}

impl<S: StatusSource, N: AlertSink> HealthMonitor<S, N> {
    pub fn new(source: S, sink: N, ledger: Arc<AlertLedger>) -> Self {
        Self {
            source,
            sink,
            ledger,
        }
    }

    /// Run a single health-check sweep.
    ///
    /// An enumeration failure skips the whole cycle; a status failure skips
    /// that service. Neither terminates the loop.
    pub async fn run_check(&self) {
        let services = match self.source.service_names().await {
            Ok(services) => services,
            Err(e) => {
                tracing::warn!("Health check skipped, could not enumerate services: {}", e);
                return;
            }
        };

        for service in services {
            let status = match self.source.status_of(&service).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", service, e);
                    continue;
                }
            };

            if status.is_failed {
                tracing::warn!("Service {} has failed", status.name);
                if self.ledger.claim(&status.name) {
                    self.sink.deliver(&status).await;
                    tracing::info!("Alert sent for {}", status.name);
                } else {
                    tracing::info!("Alert already sent today for {}, skipping", status.name);
                }
            }
        }
    }

    /// Spawn the monitor loop as a background task.
    ///
    /// Checks run at the top of every hour. The loop is a single task, so a
    /// sweep that overruns delays the next tick; it is never skipped or run
    /// in parallel.
    pub fn spawn(self) -> MonitorHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            tracing::info!("Scheduled hourly service health check");
            loop {
                let delay = next_check_delay(Local::now().naive_local());
                tokio::select! {
                    _ = sleep(delay) => self.run_check().await,
                    _ = &mut shutdown_rx => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                }
            }
        });

        MonitorHandle { shutdown_tx, task }
    }
}

/// Handle for an orderly shutdown of the monitor loop
pub struct MonitorHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

/// Time until the next on-the-hour tick.
pub(crate) fn next_check_delay(now: NaiveDateTime) -> Duration {
    let this_hour = now.date().and_hms_opt(now.hour(), 0, 0).unwrap();
    let next = this_hour + chrono::Duration::hours(1);
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
