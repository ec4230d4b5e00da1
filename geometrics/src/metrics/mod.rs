//! Pixel-based metric implementations.
//!
//! These implement the metric traits of [`crate::evaluation`] directly on the
//! masks and elevation rasters, without voxelization or registration.

pub mod geometry;
pub mod relative;
pub mod terrain;
pub mod utils;

pub use geometry::{PixelGeometryMetric, PixelGeometryMetricConfig};
pub use relative::ElevationAccuracyMetric;
pub use terrain::TerrainErrorMetric;
