// Health monitoring: alert deduplication, scheduler loop, alert delivery

pub mod ledger;
pub mod notifier;
pub mod scheduler;

#[cfg(test)]
mod tests;

use std::future::Future;

use crate::error::Result;
use crate::systemd::ServiceStatus;

pub use ledger::AlertLedger;
pub use notifier::TelegramNotifier;
pub use scheduler::{HealthMonitor, MonitorHandle};

/// Source of service names and parsed statuses.
///
/// Implemented by `SystemdClient` in production; tests drive the health
/// check with in-memory fakes.
pub trait StatusSource: Send + Sync + 'static {
    fn service_names(&self) -> impl Future<Output = Result<Vec<String>>> + Send;
    fn status_of(&self, service: &str) -> impl Future<Output = Result<ServiceStatus>> + Send;
}

/// Destination for failure alerts.
///
/// Delivery is best effort: implementations log failures instead of
/// returning them, so a broken channel cannot stall the health-check loop.
pub trait AlertSink: Send + Sync + 'static {
    fn deliver(&self, status: &ServiceStatus) -> impl Future<Output = ()> + Send;
}
