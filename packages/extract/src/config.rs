//! Extraction settings: section markers, noise phrases, and field patterns.
//!
//! The defaults live in `config/default.toml` and are baked into the binary
//! with [`include_str!`]. A replacement file with the same shape can be
//! loaded at runtime with [`ExtractionConfig::from_path`].

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Default config, embedded at compile time.
pub const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Complete extraction configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Markers delimiting the debt section.
    pub section: SectionConfig,
    /// Noise removed before the section is isolated.
    #[serde(default)]
    pub noise: NoiseConfig,
    /// Patterns for the single-value summary fields.
    pub fields: FieldPatterns,
}

/// Markers delimiting the debt section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Candidate start markers, in priority order.
    pub start_markers: Vec<String>,
    /// End marker.
    pub end_marker: String,
}

/// Page noise settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoiseConfig {
    /// Phrases that open the repeated page header block.
    #[serde(default)]
    pub header_phrases: Vec<String>,
}

/// Regex patterns for summary fields. Each must capture the value in group 1.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldPatterns {
    pub debtor_name: String,
    pub tax_id: String,
    pub capacity: String,
    pub total_debt: String,
}

impl ExtractionConfig {
    /// Parses a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed, or
    /// [`ConfigError::Missing`] if no start marker or an empty end marker is
    /// configured.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or any error
    /// from [`Self::from_toml`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_toml(&contents)
    }

    /// Returns the embedded default config.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (a build-time guarantee,
    /// covered by tests).
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default.toml: {e}"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.section.start_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Missing("section.start_markers"));
        }
        if self.section.end_marker.trim().is_empty() {
            return Err(ConfigError::Missing("section.end_marker"));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::embedded()
    }
}
