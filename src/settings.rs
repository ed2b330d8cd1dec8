use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::DEFAULT_API_BASE;
use crate::error::SettingsError;
use crate::images::DEFAULT_IMAGE_BASE;
use crate::query::DEFAULT_LIMIT;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_base_url: String,
    pub image_base_url: String,
    pub page_size: u32,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: String::from(DEFAULT_API_BASE),
            image_base_url: String::from(DEFAULT_IMAGE_BASE),
            page_size: DEFAULT_LIMIT,
            log_level: String::from("info"),
        }
    }
}

impl AppSettings {
    pub fn config_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("phimdeck")
                .join("config.json")
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&content)?;
        if !settings.is_valid() {
            warn!(path = %path.display(), "invalid settings values replaced with defaults");
        }
        Ok(settings.sanitized())
    }

    /// Reads the settings file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load(path: Option<PathBuf>) -> Self {
        let Some(path) = path.or_else(Self::config_path) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded settings");
                settings
            }
            Err(error) => {
                warn!(%error, "ignoring settings file");
                Self::default()
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.api_base_url.trim().is_empty()
            && !self.image_base_url.trim().is_empty()
            && self.page_size > 0
            && LOG_LEVELS.contains(&self.log_level.as_str())
    }

    /// Replaces each invalid field with its default.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = defaults.api_base_url;
        }
        if self.image_base_url.trim().is_empty() {
            self.image_base_url = defaults.image_base_url;
        }
        if self.page_size == 0 {
            self.page_size = defaults.page_size;
        }
        self.log_level = self.log_level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            self.log_level = defaults.log_level;
        }
        self
    }
}
