use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WatchlistError};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub max_pinned: usize,
    pub drafts_enabled: bool,
    pub draft_dir_name: String,
    pub log_level: String, // "error", "warn", "info", "debug", "trace"
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com/v1/".to_string(),
            max_pinned: 5,
            drafts_enabled: true,
            draft_dir_name: "drafts".to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl Settings {
    pub fn get_path(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    pub fn draft_dir(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.draft_dir_name)
    }

    pub fn load(data_dir: &Path) -> Self {
        let path = Self::get_path(data_dir);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("[Settings] Failed to parse settings: {}, returning defaults", e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("[Settings] Failed to read file: {}, returning defaults", e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let path = Self::get_path(data_dir);
        let tmp_path = path.with_extension("tmp");

        fs::create_dir_all(data_dir)?;

        let json = serde_json::to_string_pretty(self)?;

        // Write to tmp, then rename, so a crash never leaves a half-written file.
        fs::write(&tmp_path, json)?;
        fs::rename(tmp_path, path)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pinned == 0 {
            return Err(WatchlistError::Validation(
                "max_pinned must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.api_base_url)
            .map_err(|e| WatchlistError::Validation(format!("api_base_url: {}", e)))?;
        Ok(())
    }
}
