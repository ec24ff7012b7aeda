//! Pipeline configuration loaded from TOML.

use std::path::Path;

use building_shapes_export::DEFAULT_CSV_FILENAME;
use building_shapes_metrics::{EnrichOptions, ExtrusionScale, ViewOptions};
use serde::Deserialize;

use crate::PipelineError;

/// Built-in configuration, identical to [`PipelineConfig::default`].
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Tunables for one pipeline run. Every field is optional in TOML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Enrich features on the rayon pool when built with `parallel`.
    pub parallel: bool,
    pub extrusion: ExtrusionScale,
    pub view: ViewOptions,
    pub export: ExportConfig,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name for the tabular export.
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_CSV_FILENAME.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if the text is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, PipelineError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded pipeline config from {}", path.display());
        Ok(config)
    }

    /// Enrichment options derived from this configuration.
    #[must_use]
    pub const fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            extrusion: self.extrusion,
            parallel: self.parallel,
        }
    }
}
