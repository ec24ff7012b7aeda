//! Per-feature enrichment: measures, orientation and extrusion merged into
//! an [`EnrichedFeature`].

use building_shapes_footprint_models::{EnrichedFeature, FeatureId, PolygonFeature, ShapeMetrics};

use crate::extrusion::ExtrusionScale;
use crate::orientation::orientation_or_zero;
use crate::polygon::measure;
use crate::projection::{LocalProjection, ProjUtm};

/// Options controlling a batch enrichment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnrichOptions {
    /// Area-to-height scale.
    pub extrusion: ExtrusionScale,
    /// Spread features across the rayon pool. Ignored unless the crate is
    /// built with the `parallel` feature.
    pub parallel: bool,
}

/// Enriches a single feature. `position` is its 1-based index in the
/// normalized sequence and becomes the id when the feature has none.
#[must_use]
pub fn enrich_feature<P: LocalProjection + ?Sized>(
    feature: &PolygonFeature,
    position: usize,
    projection: &P,
    extrusion: &ExtrusionScale,
) -> EnrichedFeature {
    let measures = measure(&feature.rings);

    if measures.perimeter_m == 0.0 {
        log::debug!("Feature {position} has a degenerate outer ring");
    }

    let orientation_deg =
        orientation_or_zero(projection, &feature.rings, measures.centroid, position);

    #[allow(clippy::cast_precision_loss)]
    let feature_id = feature
        .id
        .clone()
        .unwrap_or(FeatureId::Number(position as f64));

    EnrichedFeature {
        id: feature.id.clone(),
        rings: feature.rings.clone(),
        original: feature.properties.clone(),
        metrics: ShapeMetrics {
            feature_id,
            area_sqm: measures.area_sqm,
            perimeter_m: measures.perimeter_m,
            roundness: measures.roundness,
            centroid_lat: measures.centroid.y,
            centroid_lon: measures.centroid.x,
            orientation_deg,
            extrude_height: extrusion.height(measures.area_sqm),
        },
    }
}

/// Enriches every feature with the UTM projection from PROJ, in input order.
#[must_use]
pub fn enrich_features(
    features: &[PolygonFeature],
    options: &EnrichOptions,
) -> Vec<EnrichedFeature> {
    enrich_features_with(features, &ProjUtm, options)
}

/// Enriches every feature with the given projection, in input order.
#[must_use]
pub fn enrich_features_with<P: LocalProjection + Sync + ?Sized>(
    features: &[PolygonFeature],
    projection: &P,
    options: &EnrichOptions,
) -> Vec<EnrichedFeature> {
    #[cfg(feature = "parallel")]
    if options.parallel {
        use rayon::prelude::*;

        log::debug!("Enriching {} feature(s) in parallel", features.len());
        return features
            .par_iter()
            .enumerate()
            .map(|(idx, feature)| enrich_feature(feature, idx + 1, projection, &options.extrusion))
            .collect();
    }

    log::debug!("Enriching {} feature(s)", features.len());
    features
        .iter()
        .enumerate()
        .map(|(idx, feature)| enrich_feature(feature, idx + 1, projection, &options.extrusion))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use building_shapes_footprint_models::{FEATURE_ID_KEY, Properties, PropertyValue, Ring};

    use super::*;
    use crate::polygon::tests::rectangle;

    fn feature(id: Option<FeatureId>, rings: Vec<Ring>) -> PolygonFeature {
        PolygonFeature {
            id,
            properties: [("name", PropertyValue::from("Depot"))].into_iter().collect(),
            rings,
        }
    }

    #[test]
    fn kilometer_square_metrics() {
        let enriched = enrich_feature(
            &feature(None, vec![rectangle(0.0, 0.0, 1000.0, 1000.0)]),
            1,
            &ProjUtm,
            &ExtrusionScale::default(),
        );
        let m = &enriched.metrics;

        assert!((m.area_sqm - 1_000_000.0).abs() < 5_000.0);
        assert!((m.perimeter_m - 4000.0).abs() < 20.0);
        assert!((m.roundness - PI / 4.0).abs() < 0.01);
        assert!((m.extrude_height - 120.0).abs() < f64::EPSILON);

        // Either side of a square is a valid principal axis.
        let folded = m.orientation_deg % 90.0;
        assert!(folded < 0.5 || folded > 89.5, "orientation = {}", m.orientation_deg);
        assert!(m.orientation_deg <= 180.0);
    }

    #[test]
    fn kilometer_square_away_from_central_meridian() {
        let enriched = enrich_feature(
            &feature(None, vec![rectangle(-60.0, 0.0, 1000.0, 1000.0)]),
            1,
            &ProjUtm,
            &ExtrusionScale::default(),
        );
        let bearing = enriched.metrics.orientation_deg;

        assert!(bearing <= 180.0, "orientation = {bearing}");
        let folded = bearing % 90.0;
        assert!(folded < 1.0 || folded > 89.0, "orientation = {bearing}");
    }

    #[test]
    fn fallback_id_is_one_based_position() {
        let features = vec![
            feature(Some(FeatureId::Text("a".to_string())), vec![rectangle(0.0, 0.0, 10.0, 10.0)]),
            feature(None, vec![rectangle(0.1, 0.0, 10.0, 10.0)]),
        ];

        let enriched = enrich_features(&features, &EnrichOptions::default());
        assert_eq!(enriched[0].metrics.feature_id, FeatureId::Text("a".to_string()));
        assert_eq!(enriched[1].metrics.feature_id, FeatureId::Number(2.0));
        assert_eq!(enriched[1].id, None);
    }

    #[test]
    fn originals_and_geometry_are_untouched() {
        let rings = vec![rectangle(5.0, 5.0, 30.0, 15.0)];
        let input = feature(None, rings.clone());
        let enriched = enrich_features(&[input.clone()], &EnrichOptions::default());

        assert_eq!(enriched[0].rings, rings);
        assert_eq!(enriched[0].original, input.properties);

        let merged: Properties = enriched[0].properties();
        assert_eq!(merged.keys().next(), Some("name"));
        assert_eq!(merged.get(FEATURE_ID_KEY), Some(&PropertyValue::Number(1.0)));
    }

    #[test]
    fn degenerate_feature_gets_safe_defaults() {
        let enriched = enrich_feature(
            &feature(None, vec![vec![vec![10.0, 10.0], vec![10.001, 10.001]]]),
            3,
            &ProjUtm,
            &ExtrusionScale::default(),
        );
        let m = &enriched.metrics;

        assert!(m.area_sqm.abs() < f64::EPSILON);
        assert!(m.perimeter_m.abs() < f64::EPSILON);
        assert!(m.roundness.abs() < f64::EPSILON);
        assert!(m.orientation_deg.abs() < f64::EPSILON);
        assert!((m.extrude_height - 5.0).abs() < f64::EPSILON);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_enrichment_preserves_order() {
        let features: Vec<PolygonFeature> = (0..64_i32)
            .map(|i| {
                let offset = f64::from(i);
                feature(None, vec![rectangle(offset * 0.01, 0.0, 10.0 + offset, 10.0)])
            })
            .collect();
        let options = EnrichOptions {
            parallel: true,
            ..EnrichOptions::default()
        };

        let parallel = enrich_features(&features, &options);
        let sequential = enrich_features(&features, &EnrichOptions::default());
        assert_eq!(parallel, sequential);
    }
}
