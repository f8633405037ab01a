// Telegram alert delivery

use std::time::Duration;

use crate::error::{Result, ServmonError};
use crate::monitor::AlertSink;
use crate::systemd::ServiceStatus;

// Telegram caps messages at 4096 characters; leave room for the template.
pub(crate) const MAX_STATUS_LENGTH: usize = 4096 - 500;

/// Notifier that posts formatted failure alerts to a Telegram chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    api_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    /// Create a new notifier for one bot token and chat
    pub fn new(api_token: String, chat_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("servmon-notifier")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            api_token,
            chat_id,
            client,
        })
    }

    /// Render the alert message for one failed service.
    pub fn format_alert(status: &ServiceStatus) -> String {
        let full_status = if status.full_status.is_empty() {
            "N/A".to_string()
        } else {
            truncate_status(&status.full_status)
        };

        format!(
            "*Service:* `{}`\n\
             *Last Error:* `{}`\n\
             *Is Active:* `{}`\n\
             *Is Failed:* `{}`\n\
             *Uptime:* `{}`\n\
             *Memory:* `{}`\n\
             *CPU:* `{}`\n\
             \n\
             *Full Status:*\n\
             ```\n\
             {}\n\
             ```",
            escape_markdown(&status.name),
            escape_markdown(status.last_error.as_deref().unwrap_or("N/A")),
            status.is_active,
            status.is_failed,
            escape_markdown(status.uptime.as_deref().unwrap_or("N/A")),
            escape_markdown(status.memory.as_deref().unwrap_or("N/A")),
            escape_markdown(status.cpu.as_deref().unwrap_or("N/A")),
            full_status,
        )
    }

    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.api_token);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .await
            .map_err(|e| ServmonError::Notify(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| ServmonError::Notify(e.to_string()))?;
        Ok(())
    }
}

impl AlertSink for TelegramNotifier {
    async fn deliver(&self, status: &ServiceStatus) {
        let message = Self::format_alert(status);
        if let Err(e) = self.send(&message).await {
            tracing::error!("Failed to send message to Telegram: {}", e);
        }
    }
}

/// Escape characters with syntactic meaning in Telegram Markdown.
pub(crate) fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Bound an overlong status blob, keeping the tail; errors tend to sit at
/// the end of supervisor output.
pub(crate) fn truncate_status(full_status: &str) -> String {
    let count = full_status.chars().count();
    if count <= MAX_STATUS_LENGTH {
        return full_status.to_string();
    }
    let tail: String = full_status.chars().skip(count - MAX_STATUS_LENGTH).collect();
    format!("(truncated)...\n{}", tail)
}
