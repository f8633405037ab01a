// Systemd queries through the systemctl command line

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::{Result, ServmonError};
use crate::monitor::StatusSource;
use crate::systemd::models::ServiceStatus;

/// Client for enumerating and describing project service units.
///
/// Every call shells out to `systemctl` and parses its free-text output;
/// there is no cached state. Commands carry a bounded timeout so a wedged
/// systemctl cannot stall a caller indefinitely.
#[derive(Debug, Clone)]
pub struct SystemdClient {
    unit_prefix: String,
    status_lines: usize,
    command_timeout: Duration,
}

impl SystemdClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            unit_prefix: config.unit_prefix.clone(),
            status_lines: config.status_log_lines,
            command_timeout: config.command_timeout(),
        }
    }

    pub fn unit_prefix(&self) -> &str {
        &self.unit_prefix
    }

    /// Probe that systemctl can be executed at all.
    ///
    /// The only fatal startup condition for the health-check daemon; a
    /// failing probe means there is nothing to monitor.
    pub async fn check_available(&self) -> Result<()> {
        let output = timeout(
            self.command_timeout,
            Command::new("systemctl").arg("--version").output(),
        )
        .await
        .map_err(|_| ServmonError::Enumeration("systemctl --version timed out".to_string()))?
        .map_err(|e| ServmonError::Enumeration(format!("systemctl not available: {}", e)))?;

        if !output.status.success() {
            return Err(ServmonError::Enumeration(format!(
                "systemctl --version exited with {}",
                output.status
            ))
            .into());
        }
        Ok(())
    }

    /// List project service units in the order systemd reports them
    pub async fn list_services(&self) -> Result<Vec<String>> {
        let pattern = format!("{}*", self.unit_prefix);
        let output = timeout(
            self.command_timeout,
            Command::new("systemctl")
                .args(["list-units", "--type=service", "--no-legend", pattern.as_str()])
                .output(),
        )
        .await
        .map_err(|_| ServmonError::Enumeration("systemctl list-units timed out".to_string()))?
        .map_err(|e| ServmonError::Enumeration(format!("failed to run systemctl: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ServmonError::Enumeration(format!(
                "systemctl list-units exited with {}: {}",
                output.status,
                stderr.trim()
            ))
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_unit_list(&stdout, &self.unit_prefix))
    }

    /// Combined status and log tail for one unit.
    ///
    /// Best effort: a non-zero exit (inactive and failed units) still yields
    /// the captured output, with stderr appended, so callers can parse what
    /// did come back. Only a spawn failure or timeout is an error.
    pub async fn service_info(&self, service: &str) -> Result<String> {
        let lines = format!("--lines={}", self.status_lines);
        let output = timeout(
            self.command_timeout,
            Command::new("systemctl")
                .args(["status", service, "--no-pager", lines.as_str()])
                .output(),
        )
        .await
        .map_err(|_| ServmonError::Status {
            service: service.to_string(),
            message: "systemctl status timed out".to_string(),
        })?
        .map_err(|e| ServmonError::Status {
            service: service.to_string(),
            message: format!("failed to run systemctl: {}", e),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                "systemctl status {} exited with {}: {}",
                service,
                output.status,
                stderr.trim()
            );
            Ok(format!("{}\n{}", stdout, stderr))
        }
    }

    /// Get the parsed status record for one unit
    pub async fn service_status(&self, service: &str) -> Result<ServiceStatus> {
        let text = self.service_info(service).await?;
        Ok(ServiceStatus::from_raw(service, text, &self.unit_prefix))
    }
}

impl StatusSource for SystemdClient {
    async fn service_names(&self) -> Result<Vec<String>> {
        self.list_services().await
    }

    async fn status_of(&self, service: &str) -> Result<ServiceStatus> {
        self.service_status(service).await
    }
}

/// Extract unit names from `systemctl list-units` tabular output.
///
/// Lines for degraded units carry a leading state bullet that shifts the
/// name one character right; drop it before taking the first column.
pub(crate) fn parse_unit_list(out: &str, unit_prefix: &str) -> Vec<String> {
    let mut services = Vec::new();
    for line in out.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let line = if line.starts_with(unit_prefix) {
            line
        } else {
            let mut chars = line.chars();
            chars.next();
            chars.as_str()
        };
        if let Some(name) = line.split_whitespace().next() {
            services.push(name.to_string());
        }
    }
    services
}
