use std::fs;
use std::path::Path;

use serde::Deserialize;

use framereel_core::shared::constants::{
    DEFAULT_DOCUMENT_NAME, DEFAULT_SAMPLE_COUNT, DEFAULT_VIDEO_CODEC, DEFAULT_VIDEO_NAME,
};

/// Values read from `--config`. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sample_count: usize,
    pub video_name: String,
    pub document_name: String,
    pub codec: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            video_name: DEFAULT_VIDEO_NAME.to_string(),
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            codec: DEFAULT_VIDEO_CODEC.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {e}", path.display()))?;
        let config: Config = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.sample_count == 0 {
            return Err("sample_count must be at least 1".into());
        }
        if self.video_name.trim().is_empty() {
            return Err("video_name must not be empty".into());
        }
        if self.document_name.trim().is_empty() {
            return Err("document_name must not be empty".into());
        }
        if self.codec.trim().is_empty() {
            return Err("codec must not be empty".into());
        }
        Ok(())
    }
}
