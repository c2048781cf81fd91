use crate::pane::PaneSettings;
use color_eyre::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pane: PaneConfig,
    pub assistant: AssistantConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub theme: ThemeConfig,
    pub logging: LoggingConfig,
}

/// Message pane tuning; thresholds are in terminal rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    pub page_size: usize,
    pub top_threshold: usize,
    pub near_bottom_threshold: usize,
    pub indicator_ms: u64,
    pub reply_delay_ms: u64,
    pub page_load_delay_ms: u64,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            top_threshold: 1,
            near_bottom_threshold: 3,
            indicator_ms: 2000,
            reply_delay_ms: 1500,
            page_load_delay_ms: 400,
        }
    }
}

impl PaneConfig {
    #[must_use]
    pub fn settings(&self) -> PaneSettings {
        PaneSettings {
            page_size: self.page_size.max(1),
            top_threshold: self.top_threshold,
            near_bottom_threshold: self.near_bottom_threshold,
            indicator_duration: Duration::from_millis(self.indicator_ms),
            reply_delay: Duration::from_millis(self.reply_delay_ms),
            page_load_delay: Duration::from_millis(self.page_load_delay_ms),
        }
    }
}

/// Simulated assistant; an empty reply list uses the built-in set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub replies: Vec<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub otp_delay_ms: u64,
    /// Remote country list; the built-in list is used when unset
    pub countries_url: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_delay_ms: 1000,
            countries_url: None,
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn otp_delay(&self) -> Duration {
        Duration::from_millis(self.otp_delay_ms)
    }
}

/// Whether chat messages outlive the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePersistence {
    #[default]
    Session,
    Durable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub messages: MessagePersistence,
    /// Database directory; defaults to the platform data dir
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub dark: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { dark: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "parlor=info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from disk or creates default if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for the database and log file
    pub fn data_dir(&self) -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("db")),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "parlor")
        .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let raw = r#"
            [pane]
            page_size = 5

            [storage]
            messages = "durable"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.pane.page_size, 5);
        assert_eq!(config.pane.near_bottom_threshold, 3);
        assert_eq!(config.storage.messages, MessagePersistence::Durable);
        assert_eq!(config.auth.otp_delay_ms, 1000);
        assert!(config.theme.dark);
        assert!(config.assistant.replies.is_empty());
    }

    #[test]
    fn test_defaults_survive_a_round_trip() {
        let written = toml::to_string_pretty(&Config::default()).unwrap();
        let config: Config = toml::from_str(&written).unwrap();
        assert_eq!(config.storage.messages, MessagePersistence::Session);
        assert_eq!(config.logging.filter, "parlor=info");
    }

    #[test]
    fn test_pane_settings_convert_units() {
        let settings = PaneConfig {
            page_size: 0,
            ..PaneConfig::default()
        }
        .settings();
        assert_eq!(settings.page_size, 1);
        assert_eq!(settings.reply_delay, Duration::from_millis(1500));
        assert_eq!(settings.indicator_duration, Duration::from_secs(2));
    }
}
