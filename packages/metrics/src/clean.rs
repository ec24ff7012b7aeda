//! Ring cleaning.
//!
//! Removes consecutive duplicate vertices and closes rings. Never fails:
//! a ring that is already degenerate is passed through as far as possible
//! and flagged by [`is_degenerate`].

use building_shapes_footprint_models::{Position, Ring};
use geo::{Coord, LineString, Polygon};

/// Minimum number of distinct vertices for a ring to bound any area.
pub const MIN_RING_VERTICES: usize = 3;

/// Cleans a ring: drops consecutive duplicates and appends the first
/// vertex if the ring is not closed.
#[must_use]
pub fn clean_ring(ring: &[Position]) -> Vec<Coord<f64>> {
    let mut coords: Vec<Coord<f64>> = ring
        .iter()
        .filter_map(|position| match position.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect();
    coords.dedup();

    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if coords.len() > 1 && first != last {
            coords.push(first);
        }
    }

    coords
}

/// Distinct vertices of a cleaned ring, without the closing vertex.
#[must_use]
pub fn open_vertices(ring: &[Coord<f64>]) -> &[Coord<f64>] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Returns `true` if a cleaned ring has fewer than [`MIN_RING_VERTICES`]
/// distinct vertices.
#[must_use]
pub fn is_degenerate(ring: &[Coord<f64>]) -> bool {
    open_vertices(ring).len() < MIN_RING_VERTICES
}

/// Cleans every ring and keeps the non-degenerate ones.
///
/// Returns an empty list if the outer boundary is degenerate, since holes
/// have no meaning without it.
#[must_use]
pub fn usable_rings(rings: &[Ring]) -> Vec<Vec<Coord<f64>>> {
    let mut cleaned = rings.iter().map(|ring| clean_ring(ring));

    match cleaned.next() {
        Some(exterior) if !is_degenerate(&exterior) => std::iter::once(exterior)
            .chain(cleaned.filter(|ring| !is_degenerate(ring)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Builds a `geo` polygon from usable rings.
#[must_use]
pub fn to_polygon(rings: &[Vec<Coord<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;

    Some(Polygon::new(
        LineString::from(exterior.clone()),
        interiors.iter().cloned().map(LineString::from).collect(),
    ))
}
