use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};
use crate::network::metadata::Normalization;

/// Side length of the square image the leaf model was trained on.
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "LEAFSCAN_CONFIG";
pub const MODEL_ENV: &str = "LEAFSCAN_MODEL";
pub const ADDR_ENV: &str = "LEAFSCAN_ADDR";

const DEFAULT_CONFIG_FILE: &str = "leafscan.json";

/// Top-level application configuration.
///
/// Every field has a default, so a partial JSON file only overrides what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bundled model, loaded once at startup.
    pub model_path: PathBuf,
    /// Address the screen server binds to.
    pub bind_addr: String,
    /// Used when the model does not declare its own input dimensions.
    pub image_size: u32,
    /// Used when the model does not declare its own normalization.
    pub normalization: Normalization,
    /// Used when the model does not carry its own output labels.
    pub labels: Vec<String>,
    /// Uploads above this size are refused.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            model_path: PathBuf::from("assets/leaf_recognition_model.json"),
            bind_addr: "127.0.0.1:7878".into(),
            image_size: DEFAULT_IMAGE_SIZE,
            normalization: Normalization::Symmetric,
            labels: vec!["Plant 1".into(), "Plant 2".into(), "Plant 3".into()],
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Loads `path`, returning defaults if the file does not exist.
    /// A file that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config: AppConfig = serde_json::from_str(&data)
            .map_err(|e| ClassifyError::Config(format!("{}: {}", path.display(), e)))?;
        config.check()?;
        Ok(config)
    }

    /// Resolves the config file from `LEAFSCAN_CONFIG` (or `leafscan.json`)
    /// and applies the environment overrides.
    pub fn from_env() -> Result<AppConfig> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        let mut config = AppConfig::load(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies `LEAFSCAN_MODEL` / `LEAFSCAN_ADDR` as looked up by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup(MODEL_ENV).filter(|s| !s.is_empty()) {
            self.model_path = PathBuf::from(model);
        }
        if let Some(addr) = lookup(ADDR_ENV).filter(|s| !s.is_empty()) {
            self.bind_addr = addr;
        }
    }

    fn check(&self) -> Result<()> {
        if self.image_size == 0 {
            return Err(ClassifyError::Config("image_size must be at least 1".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ClassifyError::Config("max_upload_bytes must be at least 1".into()));
        }
        Ok(())
    }
}
