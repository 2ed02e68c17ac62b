//! Generator configuration
//!
//! Optional `statuserr.toml` at the scanned root:
//!
//! ```toml
//! [generate]
//! runtime = "statuserr"
//! suffix = "__generated"
//! lang = "zh"
//! ```
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. statuserr.toml
//! 3. Default values
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::source::GENERATED_SUFFIX;

/// Config file name looked up in the scanned root
pub const CONFIG_FILE: &str = "statuserr.toml";

/// Top-level statuserr.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Generation settings
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Path of the runtime crate referenced by generated code
    #[serde(default = "default_runtime")]
    pub runtime: String,
    /// Marker appended to the snake_case type name
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Language used when listing messages
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_runtime() -> String {
    "statuserr".to_string()
}

fn default_suffix() -> String {
    GENERATED_SUFFIX.to_string()
}

fn default_lang() -> String {
    "zh".to_string()
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            runtime: default_runtime(),
            suffix: default_suffix(),
            lang: default_lang(),
        }
    }
}

/// Load `statuserr.toml` from a directory
/// Returns default config if file doesn't exist
pub fn load_project_config(dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(ProjectConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
