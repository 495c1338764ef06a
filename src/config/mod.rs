use crate::core::error::PxError;
use crate::logging::LogSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub url: String,
    pub model: String,
    pub system_msg: Option<String>,
    pub api_key: Option<String>,
    pub remember_history: bool,
    /// How many user/assistant exchanges are replayed with each question
    pub history_exchanges: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CHAT_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            system_msg: None,
            api_key: None,
            remember_history: true,
            history_exchanges: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: f64,
    pub timeout_secs: f64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 3.1,
            timeout_secs: 60.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chat: ChatConfig,
    pub http: HttpConfig,
    pub log: LogConfig,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pxutil")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_dir() -> PathBuf {
        Self::config_dir().join("history")
    }

    /// Load `~/.pxutil/config.yaml`, writing the defaults there on first use.
    pub fn load() -> Result<Config, PxError> {
        let path = Self::config_path();
        if path.exists() {
            return Self::load_from(&path);
        }

        let config = Config::default();
        // A read-only home must not stop the tools from running
        let _ = config.save_to(&path);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Config, PxError> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| PxError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PxError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// The API key from `OPENAI_API_KEY`, falling back to the config file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.chat.api_key.clone())
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            dir: self
                .log
                .dir
                .clone()
                .unwrap_or_else(|| Self::config_dir().join("logs")),
            default_filter: self.log.level.clone().unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "chat:\n  model: gpt-4o\nhttp:\n  timeout_secs: 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.url, DEFAULT_CHAT_URL);
        assert_eq!(config.http.timeout_secs, 5.0);
        assert_eq!(config.http.connect_timeout_secs, 3.1);
        assert!(config.chat.remember_history);
    }

    #[test]
    fn save_then_load_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.chat.system_msg = Some("Be brief.".to_string());
        config.log.level = Some("debug".to_string());

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "chat: [unclosed").unwrap();
        assert!(matches!(Config::load_from(&path), Err(PxError::Config(_))));
    }

    #[test]
    fn log_settings_default_to_info() {
        let settings = Config::default().log_settings();
        assert_eq!(settings.default_filter, "info");
        assert!(settings.dir.ends_with("logs"));
    }
}
