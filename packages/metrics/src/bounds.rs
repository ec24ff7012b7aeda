//! Collection bounds and view framing.

use building_shapes_footprint_models::EnrichedFeature;
use geo::{BoundingRect, Coord, MultiPoint};
use serde::{Deserialize, Serialize};

/// Axis-aligned `(lon, lat)` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Returns `true` if every corner is a finite number.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.min_lon.is_finite()
            && self.min_lat.is_finite()
            && self.max_lon.is_finite()
            && self.max_lat.is_finite()
    }

    /// `[min_lon, min_lat, max_lon, max_lat]`, the `GeoJSON` bbox order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

/// Bounds of every position of every ring in the collection.
///
/// Returns `None` for a collection without positions.
#[must_use]
pub fn collection_bounds(features: &[EnrichedFeature]) -> Option<BoundingBox> {
    let points: MultiPoint<f64> = features
        .iter()
        .flat_map(|feature| feature.rings.iter().flatten())
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect::<Vec<_>>()
        .into();

    let rect = points.bounding_rect()?;

    Some(BoundingBox::new(
        rect.min().x,
        rect.min().y,
        rect.max().x,
        rect.max().y,
    ))
}

/// Framing parameters passed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Padding around the bounds, in screen pixels.
    pub padding: u32,
    /// Maximum zoom level the fit may reach.
    pub max_zoom: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            padding: 40,
            max_zoom: 17.0,
        }
    }
}

/// A request to frame the view to the enriched collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewFit {
    pub bounds: BoundingBox,
    pub padding: u32,
    pub max_zoom: f64,
}

impl ViewFit {
    /// Builds a fit request, or `None` when the bounds are missing or not
    /// finite.
    #[must_use]
    pub fn for_features(features: &[EnrichedFeature], options: &ViewOptions) -> Option<Self> {
        let bounds = collection_bounds(features).filter(BoundingBox::is_finite)?;

        Some(Self {
            bounds,
            padding: options.padding,
            max_zoom: options.max_zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use building_shapes_footprint_models::{FeatureId, Properties, Ring, ShapeMetrics};

    use super::*;

    fn enriched(rings: Vec<Ring>) -> EnrichedFeature {
        EnrichedFeature {
            id: None,
            rings,
            original: Properties::new(),
            metrics: ShapeMetrics {
                feature_id: FeatureId::Number(1.0),
                area_sqm: 0.0,
                perimeter_m: 0.0,
                roundness: 0.0,
                centroid_lat: 0.0,
                centroid_lon: 0.0,
                orientation_deg: 0.0,
                extrude_height: 5.0,
            },
        }
    }

    #[test]
    fn bounds_cover_every_feature() {
        let features = vec![
            enriched(vec![vec![vec![1.0, 2.0], vec![3.0, 2.0], vec![3.0, 4.0], vec![1.0, 2.0]]]),
            enriched(vec![vec![vec![-5.0, 10.0, 30.0], vec![-4.0, 11.0, 30.0], vec![-5.0, 11.0, 30.0]]]),
        ];

        let bounds = collection_bounds(&features).unwrap();
        assert_eq!(bounds, BoundingBox::new(-5.0, 2.0, 3.0, 11.0));
        assert_eq!(bounds.to_vec(), vec![-5.0, 2.0, 3.0, 11.0]);
    }

    #[test]
    fn empty_collection_has_no_fit() {
        assert!(collection_bounds(&[]).is_none());
        assert!(ViewFit::for_features(&[enriched(vec![])], &ViewOptions::default()).is_none());
    }

    #[test]
    fn fit_uses_configured_framing() {
        let features = vec![enriched(vec![vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0]]])];
        let fit = ViewFit::for_features(&features, &ViewOptions::default()).unwrap();

        assert_eq!(fit.padding, 40);
        assert!((fit.max_zoom - 17.0).abs() < f64::EPSILON);
        assert_eq!(fit.bounds, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn non_finite_bounds_have_no_fit() {
        let features = vec![enriched(vec![vec![vec![f64::INFINITY, 0.0], vec![1.0, 1.0]]])];
        assert!(ViewFit::for_features(&features, &ViewOptions::default()).is_none());
    }
}
