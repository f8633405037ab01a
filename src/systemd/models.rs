// Service status data models

use serde::{Deserialize, Serialize};

use crate::systemd::status;

/// Outcome of a project's most recent CI workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiStatus {
    Success,
    Failure,
    Error,
}

impl CiStatus {
    /// Get display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            CiStatus::Success => "success",
            CiStatus::Failure => "failure",
            CiStatus::Error => "error",
        }
    }
}

/// One immutable snapshot of a unit's state, scraped from `systemctl status`
/// output. Created fresh on every query; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub is_active: bool,
    pub is_failed: bool,
    /// Present only while the unit is active.
    pub uptime: Option<String>,
    pub memory: Option<String>,
    pub cpu: Option<String>,
    pub last_error: Option<String>,
    /// The raw status blob, kept for display and alerting.
    pub full_status: String,
    pub project_group: String,
    /// Distinguishes a sidecar unit from the primary unit of its group.
    pub suffix: Option<String>,
    /// Filled separately for primary units when CI lookups are configured.
    pub ci_status: Option<CiStatus>,
}

impl ServiceStatus {
    /// Build a status record from raw `systemctl status` text.
    ///
    /// Pure with respect to the input: the same text always yields the same
    /// record. `is_active` and `is_failed` are independent substring checks,
    /// not a single state enum; systemd reports failed-but-since-restarted
    /// units with both markers present.
    pub fn from_raw(name: &str, raw: String, unit_prefix: &str) -> Self {
        let lowered = raw.to_lowercase();
        let is_active = lowered.contains("active (running)");
        let is_failed = lowered.contains("failed (result: exit-code)");
        let (project_group, suffix) = status::split_project_group(name, unit_prefix);

        ServiceStatus {
            name: name.to_string(),
            is_active,
            is_failed,
            uptime: if is_active { status::parse_uptime(&raw) } else { None },
            memory: status::parse_memory(&raw),
            cpu: status::parse_cpu(&raw),
            last_error: status::parse_last_error(&raw),
            full_status: raw,
            project_group,
            suffix,
            ci_status: None,
        }
    }

    /// Returns true for the primary unit of a project group.
    pub fn is_primary(&self) -> bool {
        self.suffix.is_none()
    }

    /// Returns the unit's current state as a user-friendly string
    pub fn status_text(&self) -> &'static str {
        if self.is_failed {
            "Failed"
        } else if self.is_active {
            "Running"
        } else {
            "Stopped"
        }
    }
}
