//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `BUTTERFLY_QUESTION_URL`, `BUTTERFLY_CHAT_URL`,
//!    `BUTTERFLY_STORAGE_PATH`
//! 2. Project-local: `.butterfly/config.toml`
//! 3. Global: `~/.butterfly/config.toml`
//!
//! Anything left unset falls back to the built-in defaults.

use crate::error::{ButterflyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const QUESTION_URL_ENV: &str = "BUTTERFLY_QUESTION_URL";
pub const CHAT_URL_ENV: &str = "BUTTERFLY_CHAT_URL";
pub const STORAGE_PATH_ENV: &str = "BUTTERFLY_STORAGE_PATH";

const DEFAULT_QUESTION_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:5000/chat";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizSection {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSection {
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobeSection {
    #[serde(default)]
    pub texture_width: Option<u32>,
    #[serde(default)]
    pub texture_height: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub window_width: Option<u32>,
    #[serde(default)]
    pub window_height: Option<u32>,
}

/// Top-level config file structure; every field is optional so layers can
/// be stacked
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub quiz: QuizSection,
    #[serde(default)]
    pub chat: ChatSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub globe: GlobeSection,
}

/// Globe window and texture settings after defaults are applied
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    pub texture_width: u32,
    pub texture_height: u32,
    /// `None` draws fresh coastlines on every mount
    pub seed: Option<u64>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            texture_width: 1024,
            texture_height: 512,
            seed: None,
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub question_base_url: String,
    pub chat_endpoint: String,
    pub storage_path: PathBuf,
    pub globe: GlobeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(ConfigFile::default())
    }
}

impl AppConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = ConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".butterfly/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config);
        Ok(Self::resolve(config))
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config);
        Ok(Self::resolve(config))
    }

    /// Directory holding the global config and the default badge store
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".butterfly")
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".butterfly").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ConfigFile> {
        log::debug!("Reading config {}", path.display());
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ButterflyError::ConfigError(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn merge_into(base: &mut ConfigFile, overlay: ConfigFile) {
        if overlay.quiz.base_url.is_some() {
            base.quiz.base_url = overlay.quiz.base_url;
        }
        if overlay.chat.endpoint.is_some() {
            base.chat.endpoint = overlay.chat.endpoint;
        }
        if overlay.storage.path.is_some() {
            base.storage.path = overlay.storage.path;
        }

        let globe = overlay.globe;
        if globe.texture_width.is_some() {
            base.globe.texture_width = globe.texture_width;
        }
        if globe.texture_height.is_some() {
            base.globe.texture_height = globe.texture_height;
        }
        if globe.seed.is_some() {
            base.globe.seed = globe.seed;
        }
        if globe.window_width.is_some() {
            base.globe.window_width = globe.window_width;
        }
        if globe.window_height.is_some() {
            base.globe.window_height = globe.window_height;
        }
    }

    fn apply_env_overrides(config: &mut ConfigFile) {
        if let Ok(url) = std::env::var(QUESTION_URL_ENV) {
            config.quiz.base_url = Some(url);
        }
        if let Ok(url) = std::env::var(CHAT_URL_ENV) {
            config.chat.endpoint = Some(url);
        }
        if let Ok(path) = std::env::var(STORAGE_PATH_ENV) {
            config.storage.path = Some(PathBuf::from(path));
        }
    }

    fn resolve(file: ConfigFile) -> Self {
        let defaults = GlobeConfig::default();
        AppConfig {
            question_base_url: file
                .quiz
                .base_url
                .unwrap_or_else(|| DEFAULT_QUESTION_URL.to_string()),
            chat_endpoint: file
                .chat
                .endpoint
                .unwrap_or_else(|| DEFAULT_CHAT_URL.to_string()),
            storage_path: file
                .storage
                .path
                .unwrap_or_else(|| Self::data_dir().join("storage.json")),
            globe: GlobeConfig {
                texture_width: file.globe.texture_width.unwrap_or(defaults.texture_width),
                texture_height: file.globe.texture_height.unwrap_or(defaults.texture_height),
                seed: file.globe.seed,
                window_width: file.globe.window_width.unwrap_or(defaults.window_width),
                window_height: file.globe.window_height.unwrap_or(defaults.window_height),
            },
        }
    }
}
