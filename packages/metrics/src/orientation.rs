//! Principal-axis orientation estimation.
//!
//! Vertices are projected into the UTM zone of the polygon's centroid and
//! the dominant eigenvector of their covariance matrix is reported as a
//! compass bearing in `[0, 360)`.

use building_shapes_footprint_models::Ring;
use geo::Coord;

use crate::clean::{open_vertices, usable_rings};
use crate::projection::{LocalProjection, ProjectionError};

/// Below this magnitude the covariance is treated as axis-aligned.
const AXIS_ALIGNED_EPSILON: f64 = 1e-9;

/// Compass bearing of the principal axis of a planar point set.
///
/// Points are `(x, y)` with `+y` pointing north. Returns 0 for fewer than
/// two points, for coincident points, or when no axis can be determined.
#[must_use]
pub fn principal_axis_bearing(points: &[Coord<f64>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    sxx /= n;
    syy /= n;
    sxy /= n;

    let trace = sxx + syy;
    if trace <= 0.0 || !trace.is_finite() {
        return 0.0;
    }
    // Dominant eigenvalue minus either diagonal term, without subtracting
    // two large nearly equal numbers.
    let half_diff = (sxx - syy) / 2.0;
    let radius = half_diff.hypot(sxy);

    let (vx, vy) = if sxy.abs() > AXIS_ALIGNED_EPSILON {
        if half_diff >= 0.0 {
            (half_diff + radius, sxy)
        } else {
            // Same axis as (lambda - syy, sxy), with x kept non-negative.
            (sxy.abs(), (radius - half_diff).copysign(sxy))
        }
    } else if sxx >= syy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    let length = vx.hypot(vy);
    if length == 0.0 || !length.is_finite() {
        return 0.0;
    }

    let bearing = (vx / length).atan2(vy / length).to_degrees();
    let bearing = if bearing < 0.0 { bearing + 360.0 } else { bearing };

    // -0.0 and float rounding can land exactly on 360.
    if bearing >= 360.0 || !bearing.is_finite() {
        0.0
    } else {
        bearing
    }
}

/// Estimates the orientation of a polygon given as raw rings.
///
/// `centroid` (`(lon, lat)`) selects the projection zone. Every distinct
/// vertex of every non-degenerate ring contributes one point.
///
/// # Errors
///
/// Returns an error if the centroid or any vertex cannot be projected.
pub fn estimate_orientation<P: LocalProjection + ?Sized>(
    projection: &P,
    rings: &[Ring],
    centroid: Coord<f64>,
) -> Result<f64, ProjectionError> {
    let vertices: Vec<Coord<f64>> = usable_rings(rings)
        .iter()
        .flat_map(|ring| open_vertices(ring).iter().copied())
        .collect();

    let projected = projection.project_all(centroid, &vertices)?;

    Ok(principal_axis_bearing(&projected))
}

/// Like [`estimate_orientation`], but logs failures and returns 0 instead.
#[must_use]
pub fn orientation_or_zero<P: LocalProjection + ?Sized>(
    projection: &P,
    rings: &[Ring],
    centroid: Coord<f64>,
    position: usize,
) -> f64 {
    match estimate_orientation(projection, rings, centroid) {
        Ok(bearing) => bearing,
        Err(e) => {
            log::warn!("Orientation for feature {position} fell back to 0: {e}");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::tests::rectangle;
    use crate::projection::ProjUtm;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn diagonal_axes() {
        let rising = coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert!((principal_axis_bearing(&rising) - 45.0).abs() < 1e-9);

        let falling = coords(&[(0.0, 3.0), (1.0, 2.0), (2.0, 1.0), (3.0, 0.0)]);
        assert!((principal_axis_bearing(&falling) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn point_order_does_not_matter() {
        let mut points = coords(&[(0.0, 0.0), (4.0, 1.0), (8.0, 2.1), (12.0, 2.9)]);
        let forward = principal_axis_bearing(&points);
        points.reverse();
        assert!((principal_axis_bearing(&points) - forward).abs() < 1e-9);
    }

    #[test]
    fn axis_aligned_tie_break() {
        let wide = coords(&[(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)]);
        assert!((principal_axis_bearing(&wide) - 90.0).abs() < 1e-9);

        let tall = coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 10.0), (0.0, 10.0)]);
        assert!(principal_axis_bearing(&tall).abs() < 1e-9);

        let square = coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!((principal_axis_bearing(&square) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn near_square_parallelogram_in_utm_coordinates() {
        // 1000 m wide, 1000.00004 m tall, top edge shifted 0.1 mm east.
        let (x0, shift, height) = (833_978.56, 1e-4, 1_000.000_04);
        let points = coords(&[
            (x0, 0.0),
            (x0 + 1_000.0, 0.0),
            (x0 + 1_000.0 + shift, height),
            (x0 + shift, height),
        ]);

        let bearing = principal_axis_bearing(&points);
        assert!((bearing - 34.1).abs() < 0.05, "bearing = {bearing}");
    }

    #[test]
    fn bearing_of_axis_stays_in_half_turn() {
        let skewed = coords(&[(0.0, 0.0), (10.0, -0.5), (10.2, 9.0), (0.1, 10.0)]);
        let bearing = principal_axis_bearing(&skewed);
        assert!((0.0..=180.0).contains(&bearing));

        let mut mirrored = skewed.clone();
        for p in &mut mirrored {
            p.x = -p.x;
        }
        assert!((0.0..=180.0).contains(&principal_axis_bearing(&mirrored)));
    }

    #[test]
    fn too_few_points_is_zero() {
        assert!(principal_axis_bearing(&[]).abs() < f64::EPSILON);
        assert!(principal_axis_bearing(&coords(&[(5.0, 5.0)])).abs() < f64::EPSILON);
        assert!(principal_axis_bearing(&coords(&[(5.0, 5.0), (5.0, 5.0)])).abs() < f64::EPSILON);
    }

    #[test]
    fn east_west_building_points_east() {
        // Centered on the zone 31 central meridian.
        let ring = rectangle(2.999, 45.0, 200.0, 20.0);
        let bearing =
            estimate_orientation(&ProjUtm, &[ring], Coord { x: 3.0, y: 45.0001 })
                .unwrap();
        assert!((bearing - 90.0).abs() < 0.5);
    }

    #[test]
    fn north_south_building_points_north() {
        let ring = rectangle(2.9999, -30.0, 20.0, 200.0);
        let bearing =
            estimate_orientation(&ProjUtm, &[ring], Coord { x: 3.0, y: -29.999 })
                .unwrap();
        let folded = bearing % 180.0;
        assert!(folded < 0.5 || folded > 179.5);
    }

    #[test]
    fn winding_does_not_change_bearing() {
        let ring = rectangle(2.999, 45.0, 200.0, 20.0);
        let mut reversed = ring.clone();
        reversed.reverse();
        let centroid = Coord { x: 3.0, y: 45.0001 };

        let a = estimate_orientation(&ProjUtm, &[ring], centroid).unwrap();
        let b = estimate_orientation(&ProjUtm, &[reversed], centroid).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn degenerate_ring_is_zero() {
        let ring = vec![vec![10.0, 10.0], vec![10.001, 10.001]];
        let bearing =
            estimate_orientation(&ProjUtm, &[ring], Coord { x: 10.0, y: 10.0 })
                .unwrap();
        assert!(bearing.abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_centroid_falls_back_to_zero() {
        let ring = rectangle(2.999, 45.0, 200.0, 20.0);
        let centroid = Coord { x: f64::NAN, y: 45.0 };

        assert!(estimate_orientation(&ProjUtm, &[ring.clone()], centroid).is_err());
        assert!(orientation_or_zero(&ProjUtm, &[ring], centroid, 1).abs() < f64::EPSILON);
    }

    #[test]
    fn bearing_stays_in_range() {
        let ring = vec![
            vec![2.0, 50.0],
            vec![2.003, 50.001],
            vec![2.0025, 50.0025],
            vec![1.9995, 50.0012],
        ];
        let bearing =
            estimate_orientation(&ProjUtm, &[ring], Coord { x: 2.001, y: 50.001 })
                .unwrap();
        assert!((0.0..360.0).contains(&bearing));
    }
}
