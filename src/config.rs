// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Resolved once at startup from an optional YAML file and environment
//! overrides:
//!
//! - `POSTCRAFT_CONFIG`: path of the YAML file (default `./postcraft.yaml`)
//! - `POSTCRAFT_INFERENCE_URL`, `POSTCRAFT_INFERENCE_API_KEY`
//! - `POSTCRAFT_IDENTITY_URL`
//! - `POSTCRAFT_FONTS_DIR`
//! - `POSTCRAFT_EXPORT_WIDTH`, `POSTCRAFT_JPEG_QUALITY`
//! - `POSTCRAFT_REQUEST_TIMEOUT_SECS`, `POSTCRAFT_CONNECT_TIMEOUT_SECS`

use crate::models::style::HexColor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "POSTCRAFT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "postcraft.yaml";
pub const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:8787/ai";
pub const DEFAULT_IDENTITY_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_EXPORT_WIDTH: u32 = 1080;
pub const DEFAULT_JPEG_QUALITY: u8 = 90;
pub const DEFAULT_EXPORT_FILE_NAME: &str = "postcraft-image.jpg";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeouts: Timeouts,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INFERENCE_URL.to_string(),
            api_key: None,
            timeouts: Timeouts::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IDENTITY_URL.to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

/// Output settings for the export compositor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Canvas width in pixels; the height follows the aspect ratio.
    pub width: u32,
    pub jpeg_quality: u8,
    /// Color behind letterboxed images.
    pub background: HexColor,
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_EXPORT_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            background: HexColor::BLACK,
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Extra directory scanned for font files.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub identity: IdentityConfig,
    pub export: ExportSettings,
    pub fonts: FontConfig,
}

impl AppConfig {
    /// Load from the config file (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            log::info!("Reading configuration from {}", path.display());
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply overrides from a variable lookup (the environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("POSTCRAFT_INFERENCE_URL") {
            self.inference.base_url = url;
        }
        if let Some(key) = lookup("POSTCRAFT_INFERENCE_API_KEY") {
            self.inference.api_key = Some(key).filter(|k| !k.trim().is_empty());
        }
        if let Some(url) = lookup("POSTCRAFT_IDENTITY_URL") {
            self.identity.base_url = url;
        }
        if let Some(dir) = lookup("POSTCRAFT_FONTS_DIR") {
            self.fonts.dir = Some(PathBuf::from(dir));
        }
        if let Some(width) = parse_var(&lookup, "POSTCRAFT_EXPORT_WIDTH")? {
            self.export.width = width;
        }
        if let Some(quality) = parse_var(&lookup, "POSTCRAFT_JPEG_QUALITY")? {
            self.export.jpeg_quality = quality;
        }
        if let Some(secs) = parse_var(&lookup, "POSTCRAFT_REQUEST_TIMEOUT_SECS")? {
            self.inference.timeouts.request_secs = secs;
            self.identity.timeouts.request_secs = secs;
        }
        if let Some(secs) = parse_var(&lookup, "POSTCRAFT_CONNECT_TIMEOUT_SECS")? {
            self.inference.timeouts.connect_secs = secs;
            self.identity.timeouts.connect_secs = secs;
        }
        self.inference.base_url = trim_url(&self.inference.base_url);
        self.identity.base_url = trim_url(&self.identity.base_url);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.width == 0 {
            return Err(invalid("export.width", "must be greater than zero"));
        }
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(invalid("export.jpeg_quality", "must be between 1 and 100"));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(invalid("export.file_name", "must not be empty"));
        }
        for (key, url) in [
            ("inference.base_url", &self.inference.base_url),
            ("identity.base_url", &self.identity.base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(invalid(key, "must be an http(s) URL"));
            }
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, &format!("cannot parse '{raw}'"))),
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.export.width, 1080);
        assert_eq!(config.export.jpeg_quality, 90);
        assert_eq!(config.export.file_name, "postcraft-image.jpg");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "export:\n  width: 2048\n  background: \"#FFFFFF\"\nfonts:\n  dir: /usr/share/fonts\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.export.width, 2048);
        assert_eq!(config.export.background, HexColor::WHITE);
        assert_eq!(config.export.jpeg_quality, 90);
        assert_eq!(config.fonts.dir, Some(PathBuf::from("/usr/share/fonts")));
        assert_eq!(config.inference.base_url, DEFAULT_INFERENCE_URL);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_bad_background_fails_to_parse() {
        assert!(AppConfig::from_yaml("export:\n  background: blue\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("POSTCRAFT_INFERENCE_URL", "https://ai.example.com/v1/"),
                ("POSTCRAFT_INFERENCE_API_KEY", "secret"),
                ("POSTCRAFT_EXPORT_WIDTH", "1440"),
                ("POSTCRAFT_REQUEST_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();
        assert_eq!(config.inference.base_url, "https://ai.example.com/v1");
        assert_eq!(config.inference.api_key.as_deref(), Some("secret"));
        assert_eq!(config.export.width, 1440);
        assert_eq!(config.inference.timeouts.request_secs, 5);
        assert_eq!(config.identity.timeouts.request_secs, 5);
        assert_eq!(config.identity.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unparseable_override_is_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(lookup(&[("POSTCRAFT_JPEG_QUALITY", "high")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "POSTCRAFT_JPEG_QUALITY"));
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[("POSTCRAFT_INFERENCE_API_KEY", "  ")]))
            .unwrap();
        assert!(config.inference.api_key.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.export.width = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.export.jpeg_quality = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.identity.base_url = "ftp://nope".into();
        assert!(config.validate().is_err());
    }
}
