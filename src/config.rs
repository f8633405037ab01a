// Configuration management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ServmonError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Unit name prefix selecting the managed service family.
    pub unit_prefix: String,
    /// Log tail length passed to `systemctl status`.
    pub status_log_lines: usize,
    pub command_timeout_secs: u64,
    pub restart_timeout_secs: u64,
    /// Local hour at which the alert-dedup day rolls over.
    pub alert_reset_hour: u32,
    pub telegram_api_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    /// GitHub owner for CI lookups; unset disables them.
    pub github_owner: Option<String>,
    pub ci_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_prefix: "projects_".to_string(),
            status_log_lines: 200,
            command_timeout_secs: 10,
            restart_timeout_secs: 30,
            alert_reset_hour: 6,
            telegram_api_token: None,
            telegram_chat_id: None,
            github_owner: None,
            ci_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Get default config path: ~/.config/servmon/config.yaml
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("servmon").join("config.yaml"))
    }

    /// Load config from path, falling back to defaults if not found
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Self::default_path().unwrap_or_default());

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to path
    pub fn save(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.alert_reset_hour > 23 {
            return Err(ServmonError::Config(format!(
                "alert_reset_hour must be 0-23, got {}",
                self.alert_reset_hour
            ))
            .into());
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn restart_timeout(&self) -> Duration {
        Duration::from_secs(self.restart_timeout_secs)
    }

    pub fn ci_timeout(&self) -> Duration {
        Duration::from_secs(self.ci_timeout_secs)
    }

    /// Telegram credentials, required to run the alerting daemon
    pub fn telegram(&self) -> Result<(String, String)> {
        match (&self.telegram_api_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Ok((token.clone(), chat_id.clone())),
            _ => Err(ServmonError::Config(
                "telegram_api_token and telegram_chat_id must be set to send alerts".to_string(),
            )
            .into()),
        }
    }
}
