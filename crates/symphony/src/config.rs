//! Bot configuration loaded from a JSON file with environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SymError};

/// Connection and identity settings for a bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymConfig {
    /// Base URL of the pod, e.g. `https://acme.symphony.com`.
    pub pod_url: String,
    /// Base URL of the agent, e.g. `https://acme-agent.symphony.com`.
    pub agent_url: String,
    /// Session authentication base URL. Defaults to `pod_url`.
    #[serde(default)]
    pub session_auth_url: Option<String>,
    /// Key manager authentication base URL. Defaults to `agent_url`.
    #[serde(default)]
    pub key_auth_url: Option<String>,
    /// PEM file holding the bot certificate and its private key.
    #[serde(default)]
    pub bot_cert_path: Option<String>,
    /// Service account username.
    #[serde(default)]
    pub bot_username: Option<String>,
    /// Service account email address.
    #[serde(default)]
    pub bot_email_address: Option<String>,
    #[serde(default)]
    pub workers: WorkerSettings,
}

/// Tuning knobs for the polling workers and in-memory caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerSettings {
    pub datafeed_retry_delay_ms: u64,
    pub presence_poll_interval_ms: u64,
    pub connections_poll_interval_ms: u64,
    pub room_sync_interval_ms: u64,
    pub dedup_window_secs: u64,
    pub dedup_max_entries: usize,
    pub feed_read_timeout_secs: u64,
    pub user_cache_ttl_secs: u64,
    pub user_cache_max_entries: usize,
    pub auto_accept_connections: bool,
    pub ignore_own_messages: bool,
    pub recover_on_reconnect: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            datafeed_retry_delay_ms: 5_000,
            presence_poll_interval_ms: 5_000,
            connections_poll_interval_ms: 10_000,
            room_sync_interval_ms: 60_000,
            dedup_window_secs: 1_800,
            dedup_max_entries: 10_000,
            feed_read_timeout_secs: 60,
            user_cache_ttl_secs: 300,
            user_cache_max_entries: 1_000,
            auto_accept_connections: false,
            ignore_own_messages: true,
            recover_on_reconnect: false,
        }
    }
}

impl WorkerSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.datafeed_retry_delay_ms)
    }

    pub fn presence_interval(&self) -> Duration {
        Duration::from_millis(self.presence_poll_interval_ms)
    }

    pub fn connections_interval(&self) -> Duration {
        Duration::from_millis(self.connections_poll_interval_ms)
    }

    pub fn room_sync_interval(&self) -> Duration {
        Duration::from_millis(self.room_sync_interval_ms)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.dedup_window_secs)
    }

    pub fn feed_read_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_read_timeout_secs)
    }

    pub fn user_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.user_cache_ttl_secs)
    }
}

impl SymConfig {
    /// Create a config with the given pod and agent URLs and default settings.
    pub fn new(pod_url: impl Into<String>, agent_url: impl Into<String>) -> Self {
        Self {
            pod_url: pod_url.into(),
            agent_url: agent_url.into(),
            session_auth_url: None,
            key_auth_url: None,
            bot_cert_path: None,
            bot_username: None,
            bot_email_address: None,
            workers: WorkerSettings::default(),
        }
    }

    /// Set the bot certificate path.
    pub fn with_cert_path(mut self, path: impl Into<String>) -> Self {
        self.bot_cert_path = Some(path.into());
        self
    }

    /// Set the bot username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Replace the worker settings.
    pub fn with_workers(mut self, workers: WorkerSettings) -> Self {
        self.workers = workers;
        self
    }

    /// Load a config file, apply `SYMPHONY_*` environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            SymError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config: SymConfig = serde_json::from_slice(&data)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("SYMPHONY_POD_URL") {
            self.pod_url = v;
        }
        if let Some(v) = non_empty("SYMPHONY_AGENT_URL") {
            self.agent_url = v;
        }
        if let Some(v) = non_empty("SYMPHONY_SESSION_AUTH_URL") {
            self.session_auth_url = Some(v);
        }
        if let Some(v) = non_empty("SYMPHONY_KEY_AUTH_URL") {
            self.key_auth_url = Some(v);
        }
        if let Some(v) = non_empty("SYMPHONY_BOT_CERT_PATH") {
            self.bot_cert_path = Some(v);
        }
        if let Some(v) = non_empty("SYMPHONY_BOT_USERNAME") {
            self.bot_username = Some(v);
        }
    }

    /// Check that every URL parses and strip trailing slashes.
    pub fn validate(&mut self) -> Result<()> {
        self.pod_url = normalize_url("podUrl", &self.pod_url)?;
        self.agent_url = normalize_url("agentUrl", &self.agent_url)?;
        if let Some(url) = self.session_auth_url.take() {
            self.session_auth_url = Some(normalize_url("sessionAuthUrl", &url)?);
        }
        if let Some(url) = self.key_auth_url.take() {
            self.key_auth_url = Some(normalize_url("keyAuthUrl", &url)?);
        }
        if self.workers.dedup_max_entries == 0 {
            return Err(SymError::Config(
                "workers.dedupMaxEntries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Session authentication base URL.
    pub fn session_auth_base(&self) -> &str {
        self.session_auth_url.as_deref().unwrap_or(&self.pod_url)
    }

    /// Key manager authentication base URL.
    pub fn key_auth_base(&self) -> &str {
        self.key_auth_url.as_deref().unwrap_or(&self.agent_url)
    }
}

fn normalize_url(field: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(SymError::Config(format!("{field} is required")));
    }
    Url::parse(trimmed).map_err(|e| SymError::Config(format!("{field} is not a valid URL: {e}")))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::SymConfig;

    #[test]
    fn parses_minimal_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"podUrl":"https://pod.example.com/","agentUrl":"https://agent.example.com"}}"#
        )
        .unwrap();

        let cfg = SymConfig::load(file.path()).unwrap();
        assert_eq!(cfg.pod_url, "https://pod.example.com");
        assert_eq!(cfg.session_auth_base(), "https://pod.example.com");
        assert_eq!(cfg.key_auth_base(), "https://agent.example.com");
        assert_eq!(cfg.workers.datafeed_retry_delay_ms, 5_000);
        assert!(cfg.workers.ignore_own_messages);
        assert!(!cfg.workers.auto_accept_connections);
    }

    #[test]
    fn partial_worker_block_keeps_other_defaults() {
        let cfg: SymConfig = serde_json::from_str(
            r#"{"podUrl":"https://p","agentUrl":"https://a","workers":{"autoAcceptConnections":true}}"#,
        )
        .unwrap();
        assert!(cfg.workers.auto_accept_connections);
        assert_eq!(cfg.workers.dedup_window_secs, 1_800);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = SymConfig::new("https://pod.example.com", "https://agent.example.com");
        let env: HashMap<&str, &str> = HashMap::from([
            ("SYMPHONY_AGENT_URL", "https://other-agent.example.com"),
            ("SYMPHONY_BOT_USERNAME", "echo-bot"),
            ("SYMPHONY_POD_URL", "  "),
        ]);
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.pod_url, "https://pod.example.com");
        assert_eq!(cfg.agent_url, "https://other-agent.example.com");
        assert_eq!(cfg.bot_username.as_deref(), Some("echo-bot"));
    }

    #[test]
    fn rejects_invalid_urls() {
        let mut cfg = SymConfig::new("not a url", "https://agent.example.com");
        assert!(cfg.validate().is_err());

        let mut cfg = SymConfig::new("", "https://agent.example.com");
        assert!(cfg.validate().is_err());
    }
}
