// CI status lookups against the GitHub Actions API

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ServmonError};
use crate::systemd::CiStatus;

/// Workflow run listing from the GitHub API
#[derive(Debug, Deserialize)]
struct WorkflowRuns {
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRun {
    conclusion: Option<String>,
}

/// Checker for a project's most recent CI conclusion.
///
/// Queried only for primary units; sidecar units inherit their project's
/// repository and would duplicate the lookup.
#[derive(Debug, Clone)]
pub struct CiChecker {
    owner: String,
    client: reqwest::Client,
}

impl CiChecker {
    /// Create a new checker for repositories under `owner`
    pub fn new(owner: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("servmon-ci-checker")
            .timeout(timeout)
            .build()?;

        Ok(Self { owner, client })
    }

    /// Fetch the conclusion of the most recent workflow run for `repo`.
    pub async fn latest_run_status(&self, repo: &str) -> Result<CiStatus> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/actions/runs?per_page=1",
            self.owner, repo
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| ServmonError::CiStatus(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServmonError::CiStatus(format!(
                "GitHub API returned status: {}",
                response.status()
            ))
            .into());
        }

        let runs: WorkflowRuns = response
            .json()
            .await
            .map_err(|e| ServmonError::CiStatus(e.to_string()))?;

        let conclusion = runs
            .workflow_runs
            .first()
            .and_then(|run| run.conclusion.as_deref());
        Ok(map_conclusion(conclusion))
    }
}

/// Map a workflow run conclusion onto the three-valued dashboard status.
///
/// An in-progress run reports no conclusion yet; that and anything
/// unrecognized (cancelled, skipped) collapse to `Error`.
pub(crate) fn map_conclusion(conclusion: Option<&str>) -> CiStatus {
    match conclusion {
        Some("success") => CiStatus::Success,
        Some("failure") => CiStatus::Failure,
        _ => CiStatus::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::map_conclusion;
    use crate::systemd::CiStatus;

    #[test]
    fn conclusion_mapping() {
        assert_eq!(map_conclusion(Some("success")), CiStatus::Success);
        assert_eq!(map_conclusion(Some("failure")), CiStatus::Failure);
        assert_eq!(map_conclusion(Some("cancelled")), CiStatus::Error);
        assert_eq!(map_conclusion(None), CiStatus::Error);
    }
}
