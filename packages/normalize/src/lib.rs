#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` input parsing and Polygon feature normalization.
//!
//! Accepts any parsed JSON value that loosely follows `GeoJSON`
//! (`FeatureCollection`, `Feature`, or a bare `Polygon`/`MultiPolygon`) and
//! flattens it into an ordered list of single-polygon features.
//! `MultiPolygon`s are split into one feature per part; every other geometry
//! type is dropped.

pub mod extract;

use building_shapes_footprint_models::PolygonFeature;
use thiserror::Error;

pub use extract::extract_polygon_features;

/// Errors that can occur while reading footprint input.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The input is not syntactically valid JSON.
    #[error("Unable to parse the input as GeoJSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The input is JSON but not an object.
    #[error("The input does not contain valid GeoJSON data")]
    NotGeoJson,

    /// The top-level `type` is not one of the accepted shapes.
    #[error("Unsupported GeoJSON type '{found}': no polygon features found")]
    UnsupportedType {
        /// The `type` member that was found (empty when missing).
        found: String,
    },

    /// Normalization produced no Polygon features.
    #[error("No polygon features were found in the GeoJSON input")]
    NoPolygonFeatures,
}

impl NormalizeError {
    /// Returns `true` for errors caused by valid JSON of the wrong shape,
    /// as opposed to unparseable text.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        !matches!(self, Self::Parse(_))
    }
}

/// Parses UTF-8 text as JSON.
///
/// # Errors
///
/// Returns [`NormalizeError::Parse`] if the text is not valid JSON.
pub fn parse_input(text: &str) -> Result<serde_json::Value, NormalizeError> {
    Ok(serde_json::from_str(text)?)
}

/// Wraps the accepted top-level shapes into a feature sequence.
///
/// A `FeatureCollection` yields its `features` as-is, a `Feature` becomes a
/// one-element sequence and a bare `Polygon`/`MultiPolygon` is wrapped in a
/// feature with empty properties.
///
/// # Errors
///
/// Returns [`NormalizeError::NotGeoJson`] for non-object input and
/// [`NormalizeError::UnsupportedType`] for any other `type`.
pub fn to_feature_sequence(
    geojson: &serde_json::Value,
) -> Result<Vec<serde_json::Value>, NormalizeError> {
    let object = geojson.as_object().ok_or(NormalizeError::NotGeoJson)?;
    let kind = object
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();

    match kind {
        "FeatureCollection" => Ok(object
            .get("features")
            .and_then(serde_json::Value::as_array)
            .cloned()
            .unwrap_or_default()),
        "Feature" => Ok(vec![geojson.clone()]),
        "Polygon" | "MultiPolygon" => Ok(vec![serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": geojson,
        })]),
        other => Err(NormalizeError::UnsupportedType {
            found: other.to_string(),
        }),
    }
}

/// Normalizes a parsed `GeoJSON` value into Polygon features.
///
/// # Errors
///
/// Returns an error if the value is not an accepted `GeoJSON` shape or if
/// no Polygon features remain after normalization.
pub fn normalize(geojson: &serde_json::Value) -> Result<Vec<PolygonFeature>, NormalizeError> {
    let features = to_feature_sequence(geojson)?;
    let polygons = extract_polygon_features(&features);

    if polygons.is_empty() {
        return Err(NormalizeError::NoPolygonFeatures);
    }

    log::debug!(
        "Normalized {} input feature(s) into {} polygon(s)",
        features.len(),
        polygons.len()
    );

    Ok(polygons)
}

/// Parses and normalizes `GeoJSON` text in one step.
///
/// # Errors
///
/// Returns an error if the text is not JSON, is not an accepted `GeoJSON`
/// shape, or contains no Polygon features.
pub fn load_polygon_features(text: &str) -> Result<Vec<PolygonFeature>, NormalizeError> {
    let geojson = parse_input(text)?;
    normalize(&geojson)
}
