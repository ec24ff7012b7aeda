#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Output writers for enriched footprints.
//!
//! [`table`] produces the comma-separated export (original columns first,
//! then the computed metrics) and [`collection`] rebuilds a `GeoJSON`
//! `FeatureCollection` carrying merged properties for rendering.

pub mod collection;
pub mod table;

pub use collection::{to_feature_collection, to_geojson_string};
pub use table::{csv_header, to_csv};

/// Default file name for the tabular export.
pub const DEFAULT_CSV_FILENAME: &str = "building_shape_metrics.csv";

/// Errors that can occur while writing output.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Flushing the output buffer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The written bytes were not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
