//! Polygon extraction from a normalized feature sequence.
//!
//! Works directly on `serde_json::Value` so that loosely-formed input
//! (missing members, stray coordinate components) degrades to dropped
//! features rather than a failed parse.

use building_shapes_footprint_models::{FeatureId, PolygonFeature, Position, Properties, Ring};

/// Extracts Polygon features from a feature sequence, in order.
///
/// Polygons pass through, `MultiPolygon`s are split into one feature per
/// part (properties copied, id not carried), and everything else is
/// skipped.
#[must_use]
pub fn extract_polygon_features(features: &[serde_json::Value]) -> Vec<PolygonFeature> {
    let mut polygons = Vec::new();

    for (idx, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            log::debug!("Skipping feature {idx}: no geometry");
            continue;
        };

        let kind = geometry
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        let coordinates = geometry.get("coordinates");

        match kind {
            "Polygon" => {
                let Some(rings) = coordinates.and_then(parse_polygon) else {
                    log::debug!("Skipping feature {idx}: malformed Polygon coordinates");
                    continue;
                };
                polygons.push(PolygonFeature {
                    id: parse_id(feature.get("id")),
                    properties: parse_properties(feature.get("properties")),
                    rings,
                });
            }
            "MultiPolygon" => {
                let Some(parts) = coordinates.and_then(serde_json::Value::as_array) else {
                    log::debug!("Skipping feature {idx}: malformed MultiPolygon coordinates");
                    continue;
                };
                let properties = parse_properties(feature.get("properties"));
                for rings in parts.iter().filter_map(parse_polygon) {
                    polygons.push(PolygonFeature {
                        id: None,
                        properties: properties.clone(),
                        rings,
                    });
                }
            }
            other => {
                log::debug!("Skipping feature {idx}: unsupported geometry type '{other}'");
            }
        }
    }

    polygons
}

/// Parses a Polygon coordinate array into rings.
///
/// Non-array rings are dropped and positions with fewer than two numeric
/// components are skipped.
fn parse_polygon(coordinates: &serde_json::Value) -> Option<Vec<Ring>> {
    let rings = coordinates.as_array()?;

    Some(
        rings
            .iter()
            .filter_map(serde_json::Value::as_array)
            .map(|ring| ring.iter().filter_map(parse_position).collect())
            .collect(),
    )
}

fn parse_position(position: &serde_json::Value) -> Option<Position> {
    let components: Position = position
        .as_array()?
        .iter()
        .map(serde_json::Value::as_f64)
        .collect::<Option<_>>()?;

    (components.len() >= 2).then_some(components)
}

fn parse_id(id: Option<&serde_json::Value>) -> Option<FeatureId> {
    match id? {
        serde_json::Value::Number(n) => n.as_f64().map(FeatureId::Number),
        serde_json::Value::String(s) => Some(FeatureId::Text(s.clone())),
        _ => None,
    }
}

fn parse_properties(properties: Option<&serde_json::Value>) -> Properties {
    properties
        .and_then(serde_json::Value::as_object)
        .cloned()
        .map(Properties::from)
        .unwrap_or_default()
}
