//! Configuration management for Fanisi.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::template::LEASE_AGREEMENT_ID;
use crate::workflow::Priority;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workflow settings
    pub workflow: WorkflowConfig,

    /// Template catalog settings
    pub templates: TemplateConfig,

    /// Document export settings
    pub export: ExportConfig,

    /// Suggestion rule settings
    pub suggestions: SuggestionConfig,
}

/// Workflow store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Prefix for new instruction ids
    pub id_prefix: String,

    /// Priority used when the intake form has no urgency level
    pub default_priority: Priority,

    /// Template generated when the lease type names no catalog template
    pub default_template: String,

    /// Compute priority from the rule table when the form has no urgency level
    pub smart_priority: bool,
}

/// Template catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of extra YAML templates merged into the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_dir: Option<PathBuf>,
}

/// Document export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory rendered documents are written to
    pub output_dir: PathBuf,

    /// File extension for rendered documents
    pub extension: String,
}

/// Suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Whether rule-based suggestions are offered
    pub enabled: bool,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.fanisi.toml` in current directory
    /// 2. `~/.config/fanisi/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".fanisi.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fanisi"))
    }

    /// Get the global config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            id_prefix: "ROF".to_string(),
            default_priority: Priority::Medium,
            default_template: LEASE_AGREEMENT_ID.to_string(),
            smart_priority: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: PathBuf::from("."), extension: "txt".to_string() }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
