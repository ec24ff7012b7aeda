#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! End-to-end building footprint enrichment.
//!
//! A run parses `GeoJSON` text, normalizes it into Polygon features,
//! enriches each one with shape metrics, summarizes the tracked metrics and
//! computes the view framing. A run either succeeds as a whole or fails at
//! the normalization stage; per-feature problems only produce fallback
//! values.
//!
//! [`Session`] keeps the output of the last successful run and replaces it
//! atomically on each new load.

pub mod config;
pub mod session;

use building_shapes_export::ExportError;
use building_shapes_footprint_models::EnrichedFeature;
use building_shapes_metrics::{ViewFit, enrich_features};
use building_shapes_normalize::{NormalizeError, load_polygon_features};
use building_shapes_stats::{MetricSummary, summarize};

pub use config::PipelineConfig;
pub use session::Session;

/// Errors that can occur while running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Writing output failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The configuration file is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything produced by one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Enriched features, in normalized input order.
    pub features: Vec<EnrichedFeature>,
    /// One summary per tracked metric.
    pub summary: Vec<MetricSummary>,
    /// View framing, when the collection bounds are finite.
    pub view: Option<ViewFit>,
}

impl PipelineOutput {
    /// The tabular export of the enriched features.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be written.
    pub fn to_csv(&self) -> Result<String, PipelineError> {
        Ok(building_shapes_export::to_csv(&self.features)?)
    }

    /// The enriched `FeatureCollection` as `GeoJSON` text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_geojson(&self) -> Result<String, PipelineError> {
        Ok(building_shapes_export::to_geojson_string(&self.features)?)
    }
}

/// Runs the whole pipeline over `GeoJSON` text.
///
/// # Errors
///
/// Returns [`PipelineError::Normalize`] if the text is not JSON, is not an
/// accepted `GeoJSON` shape, or contains no Polygon features.
pub fn run(text: &str, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    let polygons = load_polygon_features(text)?;
    let features = enrich_features(&polygons, &config.enrich_options());
    let summary = summarize(&features);
    let view = ViewFit::for_features(&features, &config.view);

    if view.is_none() {
        log::warn!("Enriched collection has no finite bounds; skipping view fit");
    }
    log::info!("Enriched {} polygon feature(s)", features.len());

    Ok(PipelineOutput {
        features,
        summary,
        view,
    })
}
