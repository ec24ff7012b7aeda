//! Polygon metrics: geodesic area, perimeter, centroid and roundness.

use std::f64::consts::PI;

use building_shapes_footprint_models::Ring;
use geo::orient::Direction;
use geo::{Centroid, Coord, GeodesicArea, MultiPoint, Orient, Point};

use crate::clean::{clean_ring, open_vertices, to_polygon, usable_rings};

/// Size measures of a single polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonMeasures {
    /// Geodesic area in square meters, holes subtracted.
    pub area_sqm: f64,
    /// Geodesic length of every ring boundary, in meters.
    pub perimeter_m: f64,
    /// Areal centroid as `(lon, lat)`.
    pub centroid: Coord<f64>,
    /// `4π·area/perimeter²`, or 0 when the perimeter is 0.
    pub roundness: f64,
}

/// Measures a polygon given as raw rings.
///
/// Degenerate input never fails: a polygon whose outer ring has fewer
/// than three distinct vertices measures 0 area and 0 perimeter, and any
/// non-finite intermediate result collapses to 0.
#[must_use]
pub fn measure(rings: &[Ring]) -> PolygonMeasures {
    let usable = usable_rings(rings);

    let Some(polygon) = to_polygon(&usable) else {
        return PolygonMeasures {
            area_sqm: 0.0,
            perimeter_m: 0.0,
            centroid: fallback_centroid(rings),
            roundness: 0.0,
        };
    };

    // Geodesic area is only well defined for counter-clockwise exteriors.
    let oriented = polygon.orient(Direction::Default);
    let area_sqm = finite_or_zero(oriented.geodesic_area_unsigned());
    let perimeter_m = finite_or_zero(oriented.geodesic_perimeter());

    let centroid = polygon
        .centroid()
        .map(Point::into)
        .filter(|c: &Coord<f64>| c.x.is_finite() && c.y.is_finite())
        .unwrap_or_else(|| fallback_centroid(rings));

    PolygonMeasures {
        area_sqm,
        perimeter_m,
        centroid,
        roundness: roundness(area_sqm, perimeter_m),
    }
}

/// Isoperimetric ratio `4π·area/perimeter²`.
///
/// Returns 0 when the perimeter is not a positive finite number. The
/// result is not clamped.
#[must_use]
pub fn roundness(area_sqm: f64, perimeter_m: f64) -> f64 {
    if perimeter_m > 0.0 && perimeter_m.is_finite() {
        finite_or_zero(4.0 * PI * area_sqm / (perimeter_m * perimeter_m))
    } else {
        0.0
    }
}

/// Mean of the outer ring's distinct vertices, or the origin when there
/// are none.
fn fallback_centroid(rings: &[Ring]) -> Coord<f64> {
    let exterior = rings
        .first()
        .map(|ring| open_vertices(&clean_ring(ring)).to_vec())
        .unwrap_or_default();

    MultiPoint::from(exterior)
        .centroid()
        .map(Point::into)
        .filter(|c: &Coord<f64>| c.x.is_finite() && c.y.is_finite())
        .unwrap_or(Coord { x: 0.0, y: 0.0 })
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Meters per degree of longitude at the equator (WGS84).
    pub const METERS_PER_DEG_LON: f64 = 111_319.490_8;
    /// Meters per degree of latitude at the equator (WGS84).
    pub const METERS_PER_DEG_LAT: f64 = 110_574.272_7;

    /// A `width_m` x `height_m` axis-aligned rectangle with its south-west
    /// corner at `(lon, lat)`, counter-clockwise.
    pub fn rectangle(lon: f64, lat: f64, width_m: f64, height_m: f64) -> Ring {
        let dx = width_m / METERS_PER_DEG_LON;
        let dy = height_m / METERS_PER_DEG_LAT;
        vec![
            vec![lon, lat],
            vec![lon + dx, lat],
            vec![lon + dx, lat + dy],
            vec![lon, lat + dy],
            vec![lon, lat],
        ]
    }

    fn relative_error(actual: f64, expected: f64) -> f64 {
        ((actual - expected) / expected).abs()
    }

    #[test]
    fn kilometer_square_at_equator() {
        let measures = measure(&[rectangle(0.0, 0.0, 1000.0, 1000.0)]);

        assert!(relative_error(measures.area_sqm, 1_000_000.0) < 0.005);
        assert!(relative_error(measures.perimeter_m, 4000.0) < 0.005);
        assert!((measures.roundness - PI / 4.0).abs() < 0.01);
        assert!((measures.centroid.x - 0.004_49).abs() < 1e-4);
        assert!((measures.centroid.y - 0.004_52).abs() < 1e-4);
    }

    #[test]
    fn winding_does_not_change_area() {
        let ccw = rectangle(10.0, 45.0, 80.0, 30.0);
        let mut cw = ccw.clone();
        cw.reverse();

        let a = measure(&[ccw]);
        let b = measure(&[cw]);
        assert!(a.area_sqm > 0.0);
        assert!((a.area_sqm - b.area_sqm).abs() < 1e-6 * a.area_sqm);
        assert!((a.perimeter_m - b.perimeter_m).abs() < 1e-6);
    }

    #[test]
    fn holes_subtract_area_and_add_perimeter() {
        let outer = rectangle(0.0, 0.0, 100.0, 100.0);
        let mut hole = rectangle(0.0002, 0.0002, 20.0, 20.0);
        hole.reverse();

        let solid = measure(&[outer.clone()]);
        let holed = measure(&[outer, hole]);

        assert!(relative_error(solid.area_sqm - holed.area_sqm, 400.0) < 0.01);
        assert!(relative_error(holed.perimeter_m - solid.perimeter_m, 80.0) < 0.01);
    }

    #[test]
    fn two_vertex_ring_measures_zero() {
        let measures = measure(&[vec![vec![10.0, 10.0], vec![10.001, 10.001]]]);

        assert!(measures.area_sqm.abs() < f64::EPSILON);
        assert!(measures.perimeter_m.abs() < f64::EPSILON);
        assert!(measures.roundness.abs() < f64::EPSILON);
        assert!((measures.centroid.x - 10.0005).abs() < 1e-9);
        assert!((measures.centroid.y - 10.0005).abs() < 1e-9);
    }

    #[test]
    fn empty_polygon_centroid_is_origin() {
        let measures = measure(&[]);
        assert!(measures.centroid.x.abs() < f64::EPSILON);
        assert!(measures.centroid.y.abs() < f64::EPSILON);
        assert!(measures.area_sqm.abs() < f64::EPSILON);
    }

    #[test]
    fn roundness_is_zero_without_perimeter() {
        assert!(roundness(10.0, 0.0).abs() < f64::EPSILON);
        assert!(roundness(10.0, f64::NAN).abs() < f64::EPSILON);
        assert!((roundness(PI, 2.0 * PI) - 1.0).abs() < 1e-12);
    }
}
