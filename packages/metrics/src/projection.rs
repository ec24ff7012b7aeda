//! Local planar projections used for orientation estimation.
//!
//! Latitude/longitude is neither angle- nor distance-preserving, so vertex
//! positions are projected into the UTM zone containing the polygon before
//! any covariance is computed. [`ProjUtm`] does the projection through the
//! PROJ library.

use std::fmt;

use geo::Coord;
use proj::Proj;
use thiserror::Error;

/// Width of a UTM zone in degrees of longitude.
const ZONE_WIDTH_DEG: f64 = 6.0;
const ZONE_COUNT: i64 = 60;

/// Errors raised while projecting coordinates.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A coordinate was non-finite or outside the valid latitude range.
    #[error("Invalid coordinate ({lon}, {lat})")]
    InvalidCoordinate {
        /// Longitude in degrees.
        lon: f64,
        /// Latitude in degrees.
        lat: f64,
    },

    /// The projection produced a non-finite planar position.
    #[error("Projection of ({lon}, {lat}) is not finite")]
    NonFinite {
        /// Longitude in degrees.
        lon: f64,
        /// Latitude in degrees.
        lat: f64,
    },

    /// The projection backend reported an error.
    #[error("Projection backend error: {0}")]
    Backend(String),
}

/// A UTM zone: 6°-wide longitude band number plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    /// Zone number, 1-60.
    pub number: u8,
    /// `true` for the southern hemisphere (false northing applied).
    pub south: bool,
}

impl UtmZone {
    /// Selects the zone for a projection origin given as `(lon, lat)`.
    ///
    /// Longitudes outside `[-180, 180)` wrap around, so 180° falls in
    /// zone 1. Negative latitudes select the southern hemisphere.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidCoordinate`] if the origin is not
    /// finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_origin(origin: Coord<f64>) -> Result<Self, ProjectionError> {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return Err(ProjectionError::InvalidCoordinate {
                lon: origin.x,
                lat: origin.y,
            });
        }

        let band = ((origin.x + 180.0) / ZONE_WIDTH_DEG).floor() as i64;

        Ok(Self {
            number: (band.rem_euclid(ZONE_COUNT) + 1) as u8,
            south: origin.y < 0.0,
        })
    }

    /// EPSG code of the WGS84 UTM CRS for this zone (326xx north,
    /// 327xx south).
    #[must_use]
    pub fn epsg_code(self) -> u16 {
        let base = if self.south { 32_700 } else { 32_600 };
        base + u16::from(self.number)
    }

    /// CRS identifier for this zone, e.g. `EPSG:32631`.
    #[must_use]
    pub fn crs(self) -> String {
        format!("EPSG:{}", self.epsg_code())
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, if self.south { 'S' } else { 'N' })
    }
}

/// Projects geographic coordinates into a planar frame local to an origin.
pub trait LocalProjection {
    /// Projects `coords` (`(lon, lat)` degrees) into meters in a frame
    /// chosen for `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or any coordinate cannot be
    /// projected.
    fn project_all(
        &self,
        origin: Coord<f64>,
        coords: &[Coord<f64>],
    ) -> Result<Vec<Coord<f64>>, ProjectionError>;
}

/// UTM projection through the PROJ library.
///
/// A transformation from `EPSG:4326` to the zone's WGS84 UTM CRS is built
/// for every call, so the type is cheap to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjUtm;

impl ProjUtm {
    /// Builds the `EPSG:4326` to UTM transformation for `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Backend`] if PROJ cannot create the
    /// transformation.
    pub fn transformer(zone: UtmZone) -> Result<Proj, ProjectionError> {
        Proj::new_known_crs("EPSG:4326", &zone.crs(), None)
            .map_err(|e| ProjectionError::Backend(e.to_string()))
    }
}

impl LocalProjection for ProjUtm {
    fn project_all(
        &self,
        origin: Coord<f64>,
        coords: &[Coord<f64>],
    ) -> Result<Vec<Coord<f64>>, ProjectionError> {
        let zone = UtmZone::for_origin(origin)?;
        log::trace!("Projecting {} vertices into UTM zone {zone}", coords.len());
        let proj = Self::transformer(zone)?;

        coords
            .iter()
            .map(|&Coord { x: lon, y: lat }| {
                if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
                    return Err(ProjectionError::InvalidCoordinate { lon, lat });
                }
                let (x, y) = proj
                    .convert((lon, lat))
                    .map_err(|e| ProjectionError::Backend(e.to_string()))?;
                if x.is_finite() && y.is_finite() {
                    Ok(Coord { x, y })
                } else {
                    Err(ProjectionError::NonFinite { lon, lat })
                }
            })
            .collect()
    }
}
