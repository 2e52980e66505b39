//! Configuration management for apidoc.
//!
//! Parses `apidoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [annotations]
//! marker = "@"
//! require_line_start = true
//! class_prefix = "jsdoc"
//! skip_code_fences = true
//!
//! [markdown]
//! gfm = true
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "apidoc.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Annotation syntax and output settings.
    pub annotations: AnnotationsConfig,
    /// Host markdown settings.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Annotation syntax and output settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationsConfig {
    /// Character that introduces a tag.
    pub marker: char,
    /// Only recognize tags at the start of a line's content.
    ///
    /// When off, the first marker on a line followed by a tag name starts a
    /// tag, even mid-sentence.
    pub require_line_start: bool,
    /// Prefix for every CSS class emitted by the default templates.
    pub class_prefix: String,
    /// Leave fenced code blocks untouched.
    pub skip_code_fences: bool,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            marker: '@',
            require_line_start: true,
            class_prefix: "jsdoc".to_owned(),
            skip_code_fences: true,
        }
    }
}

/// Host markdown settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apidoc.toml` in the current directory and
    /// its parents, falling back to defaults when none exists.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("no {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Search for the config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML or unknown keys and
    /// `ConfigError::Validation` for out-of-range values.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annotations.validate()
    }
}

impl AnnotationsConfig {
    /// Validate the marker and class prefix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if either value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.marker;
        // Block prefix characters would be taken for blockquotes, headings
        // or list items before the marker is ever looked at.
        if marker.is_alphanumeric()
            || marker.is_whitespace()
            || matches!(marker, '{' | '}' | '_' | '>' | '#' | '-' | '*' | '+')
        {
            return Err(ConfigError::Validation(format!(
                "annotations.marker cannot be {marker:?}"
            )));
        }

        if self.class_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "annotations.class_prefix cannot be empty".to_owned(),
            ));
        }
        if let Some(bad) = self
            .class_prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_')))
        {
            return Err(ConfigError::Validation(format!(
                "annotations.class_prefix contains invalid character {bad:?}"
            )));
        }

        Ok(())
    }
}
