//! Service configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP API listens on.
    pub port: u16,
    /// Path of the persisted campaign snapshot.
    pub state_path: PathBuf,
    /// Directory holding message template files.
    pub templates_dir: PathBuf,
    /// Delay between dispatch ticks (one send per tick).
    pub tick_interval: Duration,
    /// Optional SMTP credentials applied to every channel.
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

impl ServiceConfig {
    /// Build config from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("MAILBURST_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let state_path = std::env::var("MAILBURST_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        let templates_dir = std::env::var("MAILBURST_TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.templates_dir);

        let tick_interval = std::env::var("MAILBURST_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval);

        Self {
            port,
            state_path,
            templates_dir,
            tick_interval,
            smtp_username: std::env::var("MAILBURST_SMTP_USERNAME").ok(),
            smtp_password: std::env::var("MAILBURST_SMTP_PASSWORD").ok(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            state_path: PathBuf::from("./data/state.json"),
            templates_dir: PathBuf::from("./templates"),
            tick_interval: Duration::from_secs(2),
            smtp_username: None,
            smtp_password: None,
        }
    }
}
