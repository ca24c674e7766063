//! Configuration handling for the timeline CLI
//!
//! Configuration is stored in `timeline.toml` (project, found by walking up
//! from the current directory) and `~/.config/timeline/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "timeline.toml";

/// Narrowest chart track that still fits a few ticks
const MIN_TRACK_WIDTH: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for the ASCII chart drawn by `timeline layout`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Columns used for the time axis
    pub track_width: usize,

    /// Columns reserved for lane and item labels
    pub label_width: usize,

    /// Shortest bar drawn for a visible item
    pub min_bar_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            track_width: 60,
            label_width: 16,
            min_bar_chars: 1,
        }
    }
}

/// Settings for `timeline watch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before a burst of edits is re-rendered
    pub debounce_millis: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_millis: 300 }
    }
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
    pub render: RenderConfig,
    pub watch: WatchConfig,
}

impl ProjectConfig {
    /// Rejects settings the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.track_width < MIN_TRACK_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "render.track_width must be at least {}, got {}",
                MIN_TRACK_WIDTH, self.render.track_width
            )));
        }
        if self.render.min_bar_chars == 0 {
            return Err(ConfigError::Invalid(
                "render.min_bar_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project_root = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_root(&dir));

        let project = match &project_root {
            Some(root) => Self::load_project_config(root)?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "timeline", "timeline").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_CONFIG_FILE);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the nearest directory at or above `start` holding `timeline.toml`
    pub fn find_project_root(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(PROJECT_CONFIG_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}
