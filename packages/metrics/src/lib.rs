#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building footprint shape metrics.
//!
//! Turns normalized Polygon features into enriched features carrying
//! geodesic area, perimeter, roundness, centroid, principal-axis
//! orientation and a cosmetic extrusion height. Degenerate geometry never
//! fails: each metric falls back to a safe value and the batch continues.
//!
//! Orientation is estimated in a UTM projection built with PROJ. Enable the
//! `parallel` feature to spread enrichment over rayon's thread pool.

pub mod bounds;
pub mod clean;
pub mod enrich;
pub mod extrusion;
pub mod orientation;
pub mod polygon;
pub mod projection;

pub use bounds::{BoundingBox, ViewFit, ViewOptions, collection_bounds};
pub use enrich::{EnrichOptions, enrich_feature, enrich_features, enrich_features_with};
pub use extrusion::ExtrusionScale;
pub use projection::{LocalProjection, ProjUtm, ProjectionError, UtmZone};
