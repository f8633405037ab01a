// Privileged service control operations

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::Config;
use crate::error::{Result, ServmonError};
use crate::systemd::SystemdClient;

/// Controller for the privileged restart path.
///
/// Restart is the one operation here that mutates system state, so it is
/// fenced twice: the name must be syntactically a service unit, and it must
/// be a member of the currently enumerated project set. Membership is
/// re-checked on every call, never cached.
#[derive(Debug, Clone)]
pub struct ServiceController {
    client: SystemdClient,
    restart_timeout: Duration,
}

impl ServiceController {
    /// Create a new controller sharing the query client
    pub fn new(client: SystemdClient, config: &Config) -> Self {
        Self {
            client,
            restart_timeout: config.restart_timeout(),
        }
    }

    /// Restart a service unit.
    ///
    /// No retry on failure: a second restart issued while the first is still
    /// settling could race, so the caller decides whether to try again.
    pub async fn restart_service(&self, service: &str) -> Result<()> {
        self.validate_service_name(service)?;

        let known = self.client.list_services().await?;
        ensure_member(service, &known)?;

        // Requires appropriate sudoers configuration for the running user
        let output = timeout(
            self.restart_timeout,
            Command::new("sudo")
                .args(["systemctl", "restart", service])
                .output(),
        )
        .await
        .map_err(|_| ServmonError::Restart {
            service: service.to_string(),
            stderr: format!("timed out after {:?}", self.restart_timeout),
        })?
        .map_err(|e| ServmonError::Restart {
            service: service.to_string(),
            stderr: format!("failed to run sudo systemctl: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!("Failed to restart {}: {}", service, stderr.trim());
            return Err(ServmonError::Restart {
                service: service.to_string(),
                stderr,
            }
            .into());
        }

        tracing::info!("Successfully restarted service {}", service);
        Ok(())
    }

    /// Validate service name format and prevent injection
    pub(crate) fn validate_service_name(&self, service_name: &str) -> Result<()> {
        if service_name.is_empty() {
            return Err(ServmonError::InvalidService("(empty)".to_string()).into());
        }

        // No path traversal, no null bytes, reasonable length
        if service_name.contains("..") || service_name.contains('\0') || service_name.len() > 256 {
            return Err(ServmonError::InvalidService(service_name.to_string()).into());
        }

        if !service_name.ends_with(".service") {
            return Err(ServmonError::InvalidService(service_name.to_string()).into());
        }

        Ok(())
    }
}

/// Reject a restart request for a unit outside the enumerated set.
pub(crate) fn ensure_member(service: &str, known: &[String]) -> Result<()> {
    if known.iter().any(|name| name == service) {
        Ok(())
    } else {
        tracing::warn!("Attempt to restart unknown or disallowed service: {}", service);
        Err(ServmonError::InvalidService(service.to_string()).into())
    }
}
