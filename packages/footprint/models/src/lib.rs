#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Footprint feature and shape metric types.
//!
//! These types are shared by every stage of the enrichment pipeline: the
//! normalizer produces [`PolygonFeature`]s, the metrics engine turns them
//! into [`EnrichedFeature`]s, and the statistics and export stages read the
//! computed [`ShapeMetrics`] back out through [`MetricKey`].

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Property key carrying the original feature id (or 1-based fallback).
pub const FEATURE_ID_KEY: &str = "feature_id";

/// A single `[lon, lat, ...]` position. Extra components (altitude) are
/// carried through untouched.
pub type Position = Vec<f64>;

/// An ordered sequence of positions. Closed when first == last.
pub type Ring = Vec<Position>;

// ── Property values ──────────────────────────────────────────────────────

/// A property value from a feature's property bag.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(f64),
    /// JSON string.
    Text(String),
    /// Array or object values, kept verbatim.
    Nested(serde_json::Value),
}

impl PropertyValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `true` for [`PropertyValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts back into a JSON value.
    ///
    /// Integral numbers are written without a fractional part; non-finite
    /// numbers have no JSON representation and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Nested(v) => v.clone(),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_json(n: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Nested(nested)
            }
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Text form used for tabular output. `Null` renders as an empty string.
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Nested(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

// ── Property bag ─────────────────────────────────────────────────────────

/// Insertion-ordered mapping from property key to value.
///
/// Key order is significant: the tabular export lists original columns in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropertyValue)>,
}

impl Properties {
    /// Creates an empty property bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Looks up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts a value. An existing key keeps its position and has its
    /// value replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();

        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts into a JSON object, preserving values.
    #[must_use]
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Properties {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut properties = Self::new();
        for (key, value) in map {
            properties.insert(key, PropertyValue::from(value));
        }
        properties
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key, value);
        }
        properties
    }
}

// ── Features ─────────────────────────────────────────────────────────────

/// A GeoJSON feature id: either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numeric id.
    Number(f64),
    /// String id.
    Text(String),
}

impl From<&FeatureId> for PropertyValue {
    fn from(id: &FeatureId) -> Self {
        match id {
            FeatureId::Number(n) => Self::Number(*n),
            FeatureId::Text(s) => Self::Text(s.clone()),
        }
    }
}

/// A single Polygon feature as produced by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    /// Original feature id, if the input carried a non-null one.
    pub id: Option<FeatureId>,
    /// Caller-supplied properties.
    pub properties: Properties,
    /// Rings: the first is the outer boundary, the rest are holes.
    pub rings: Vec<Ring>,
}

// ── Computed metrics ─────────────────────────────────────────────────────

/// The numeric metrics computed per footprint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricKey {
    /// Geodesic area in square meters.
    AreaSqm,
    /// Boundary length in meters.
    PerimeterM,
    /// Isoperimetric ratio `4π·area/perimeter²`.
    Roundness,
    /// Centroid latitude in degrees.
    CentroidLat,
    /// Centroid longitude in degrees.
    CentroidLon,
    /// Principal-axis compass bearing in `[0, 360)`.
    OrientationDeg,
    /// Cosmetic extrusion height.
    ExtrudeHeight,
}

impl MetricKey {
    /// Computed columns, in export order.
    pub const COMPUTED: &[Self] = &[
        Self::AreaSqm,
        Self::PerimeterM,
        Self::Roundness,
        Self::CentroidLat,
        Self::CentroidLon,
        Self::OrientationDeg,
        Self::ExtrudeHeight,
    ];

    /// Metrics aggregated into the statistics summary.
    pub const TRACKED: &[Self] = &[
        Self::AreaSqm,
        Self::Roundness,
        Self::CentroidLat,
        Self::CentroidLon,
        Self::OrientationDeg,
    ];

    /// Human-readable label for summary tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AreaSqm => "Area (m²)",
            Self::PerimeterM => "Perimeter (m)",
            Self::Roundness => "Roundness",
            Self::CentroidLat => "Centroid Latitude",
            Self::CentroidLon => "Centroid Longitude",
            Self::OrientationDeg => "Major Axis Orientation (°)",
            Self::ExtrudeHeight => "Extrusion Height",
        }
    }

    /// Fraction digits used when displaying this metric.
    #[must_use]
    pub const fn precision(self) -> usize {
        match self {
            Self::AreaSqm | Self::PerimeterM | Self::OrientationDeg | Self::ExtrudeHeight => 2,
            Self::Roundness => 3,
            Self::CentroidLat | Self::CentroidLon => 5,
        }
    }

    /// Returns `true` if `key` names one of the computed columns.
    #[must_use]
    pub fn is_computed(key: &str) -> bool {
        Self::COMPUTED.iter().any(|m| m.as_ref() == key)
    }
}

/// Metrics computed for a single footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    /// Original id, or the 1-based position in the normalized sequence.
    pub feature_id: FeatureId,
    pub area_sqm: f64,
    pub perimeter_m: f64,
    pub roundness: f64,
    pub centroid_lat: f64,
    pub centroid_lon: f64,
    pub orientation_deg: f64,
    pub extrude_height: f64,
}

impl ShapeMetrics {
    /// Reads a metric by key.
    #[must_use]
    pub const fn value(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::AreaSqm => self.area_sqm,
            MetricKey::PerimeterM => self.perimeter_m,
            MetricKey::Roundness => self.roundness,
            MetricKey::CentroidLat => self.centroid_lat,
            MetricKey::CentroidLon => self.centroid_lon,
            MetricKey::OrientationDeg => self.orientation_deg,
            MetricKey::ExtrudeHeight => self.extrude_height,
        }
    }
}

/// A footprint with its computed metrics attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFeature {
    /// Original feature id, if any.
    pub id: Option<FeatureId>,
    /// Geometry, unchanged from the normalized input.
    pub rings: Vec<Ring>,
    /// Caller-supplied properties, untouched.
    pub original: Properties,
    /// Computed metrics.
    pub metrics: ShapeMetrics,
}

impl EnrichedFeature {
    /// Merges the computed metrics over the original properties.
    ///
    /// Original keys keep their order; computed keys overwrite in place or
    /// are appended in [`MetricKey::COMPUTED`] order after `feature_id`.
    #[must_use]
    pub fn properties(&self) -> Properties {
        let mut merged = self.original.clone();
        merged.insert(FEATURE_ID_KEY, &self.metrics.feature_id);
        for &key in MetricKey::COMPUTED {
            merged.insert(key.as_ref(), self.metrics.value(key));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> ShapeMetrics {
        ShapeMetrics {
            feature_id: FeatureId::Number(1.0),
            area_sqm: 100.0,
            perimeter_m: 40.0,
            roundness: 0.785,
            centroid_lat: 1.5,
            centroid_lon: 2.5,
            orientation_deg: 90.0,
            extrude_height: 10.0,
        }
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut props = Properties::new();
        props.insert("a", 1.0);
        props.insert("b", "x");
        props.insert("a", 2.0);

        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a"), Some(&PropertyValue::Number(2.0)));
    }

    #[test]
    fn metric_keys_use_snake_case_names() {
        let names: Vec<&str> = MetricKey::COMPUTED.iter().map(|m| m.as_ref()).collect();
        assert_eq!(
            names,
            vec![
                "area_sqm",
                "perimeter_m",
                "roundness",
                "centroid_lat",
                "centroid_lon",
                "orientation_deg",
                "extrude_height",
            ]
        );
        assert!(MetricKey::is_computed("roundness"));
        assert!(!MetricKey::is_computed("feature_id"));
    }

    #[test]
    fn merged_properties_keep_original_order() {
        let feature = EnrichedFeature {
            id: None,
            rings: vec![],
            original: [("name", PropertyValue::from("Hall")), ("roundness", PropertyValue::Number(7.0))]
                .into_iter()
                .collect(),
            metrics: sample_metrics(),
        };

        let merged = feature.properties();
        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(keys[0], "name");
        assert_eq!(keys[1], "roundness");
        assert_eq!(keys[2], FEATURE_ID_KEY);
        assert_eq!(merged.get("roundness"), Some(&PropertyValue::Number(0.785)));
        assert_eq!(merged.len(), 2 + 1 + 6);
    }

    #[test]
    fn display_matches_tabular_conventions() {
        assert_eq!(PropertyValue::Null.to_string(), "");
        assert_eq!(PropertyValue::Number(3.0).to_string(), "3");
        assert_eq!(PropertyValue::Number(0.25).to_string(), "0.25");
        assert_eq!(PropertyValue::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(PropertyValue::Bool(true).to_string(), "true");
        assert_eq!(
            PropertyValue::from(serde_json::json!({"a": 1})).to_string(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn integral_numbers_round_trip_as_integers() {
        assert_eq!(PropertyValue::Number(4.0).to_json(), serde_json::json!(4));
        assert_eq!(PropertyValue::Number(4.5).to_json(), serde_json::json!(4.5));
        assert_eq!(
            PropertyValue::Number(f64::INFINITY).to_json(),
            serde_json::Value::Null
        );
    }
}
