//! Desk configuration, loaded from a JSON file.

use crate::reminder::SmtpSettings;
use serde::{Deserialize, Serialize};

/// Environment variable holding the SMTP password (or app password).
pub const SMTP_PASSWORD_ENV: &str = "FEEDESK_SMTP_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub sender: String,
    #[serde(default = "default_smtp_timeout")]
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            sender: String::new(),
            timeout_secs: default_smtp_timeout(),
        }
    }
}

impl SmtpConfig {
    /// Combine the file settings with a credential supplied at send time.
    pub fn with_password(&self, password: impl Into<String>) -> SmtpSettings {
        SmtpSettings {
            host: self.host.clone(),
            port: self.port,
            sender: self.sender.clone(),
            password: password.into(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Settings with the password taken from FEEDESK_SMTP_PASSWORD.
    pub fn with_env_password(&self) -> anyhow::Result<SmtpSettings> {
        let password = std::env::var(SMTP_PASSWORD_ENV)
            .map_err(|_| anyhow::anyhow!("{SMTP_PASSWORD_ENV} is not set"))?;
        Ok(self.with_password(password))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default = "default_report_title")]
    pub report_title: String,
    #[serde(default = "default_signature")]
    pub reminder_signature: String,
    /// None keeps the journal in memory for the life of the process.
    #[serde(default)]
    pub journal_path: Option<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            smtp: SmtpConfig::default(),
            report_title: default_report_title(),
            reminder_signature: default_signature(),
            journal_path: None,
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        Ok(config)
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_timeout() -> u64 {
    20
}

fn default_report_title() -> String {
    "Student Fee Report".into()
}

fn default_signature() -> String {
    "Accounts Office".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: DeskConfig =
            serde_json::from_str(r#"{ "smtp": { "sender": "office@example.edu" } }"#).unwrap();
        assert_eq!(cfg.smtp.host, "smtp.gmail.com");
        assert_eq!(cfg.smtp.port, 587);
        assert_eq!(cfg.smtp.sender, "office@example.edu");
        assert_eq!(cfg.report_title, "Student Fee Report");
        assert!(cfg.journal_path.is_none());
    }
}
