//! Enriched `GeoJSON` `FeatureCollection` output.

use building_shapes_footprint_models::{EnrichedFeature, FeatureId, PropertyValue};
use building_shapes_metrics::collection_bounds;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};

use crate::ExportError;

/// Builds a `FeatureCollection` of the enriched footprints.
///
/// Each feature keeps its original geometry and id and carries the merged
/// original and computed properties. The collection bbox is set when the
/// bounds are finite.
#[must_use]
pub fn to_feature_collection(features: &[EnrichedFeature]) -> FeatureCollection {
    let bbox = collection_bounds(features)
        .filter(building_shapes_metrics::BoundingBox::is_finite)
        .map(|bounds| bounds.to_vec());

    FeatureCollection {
        bbox,
        features: features.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes the enriched collection as pretty-printed `GeoJSON`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_geojson_string(features: &[EnrichedFeature]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&to_feature_collection(features))?)
}

fn to_feature(feature: &EnrichedFeature) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(feature.rings.clone()))),
        id: feature.id.as_ref().and_then(to_geojson_id),
        properties: Some(feature.properties().to_json_map()),
        foreign_members: None,
    }
}

fn to_geojson_id(id: &FeatureId) -> Option<Id> {
    match PropertyValue::from(id).to_json() {
        serde_json::Value::Number(n) => Some(Id::Number(n)),
        serde_json::Value::String(s) => Some(Id::String(s)),
        _ => None,
    }
}
