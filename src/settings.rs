use crate::realm::{RealmClient, RealmError, DEFAULT_REALM_PATH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Full URL of the user-info endpoint.
    #[serde(default = "default_realm_url")]
    pub realm_url: String,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Append every displayed notification to `notifications.log`.
    #[serde(default = "default_notification_log")]
    pub notification_log: bool,
    /// Auto-dismiss delay applied to the console's own notifications.
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
}

fn default_realm_url() -> String {
    format!("http://localhost:8080{DEFAULT_REALM_PATH}")
}

fn default_notification_log() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_window_size() -> (f32, f32) {
    (960.0, 640.0)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            realm_url: default_realm_url(),
            debug_logging: false,
            log_file: None,
            notification_log: default_notification_log(),
            default_timeout_ms: default_timeout_ms(),
            window_size: default_window_size(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn realm_client(&self) -> Result<RealmClient, RealmError> {
        RealmClient::new(&self.realm_url)
    }
}
