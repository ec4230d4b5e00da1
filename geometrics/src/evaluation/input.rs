//! Input structures handed to the metric implementations.
//!
//! Tensors are cheap to clone; every input owns handles to the rasters it
//! needs so that metric implementations are free to consume them.

use burn::tensor::backend::Backend;

use crate::raster::{ElevationRaster, GeoTransform, Mask};

/// Result record of one metric evaluation.
pub type MetricRecord = serde_json::Map<String, serde_json::Value>;

/// Inputs of the threshold geometry metric for one match-value pair.
#[derive(Debug, Clone)]
pub struct ThresholdGeometryInput<B: Backend> {
    pub reference_dsm: ElevationRaster<B>,
    pub reference_dtm: ElevationRaster<B>,
    pub reference_mask: Mask<B>,
    pub test_dsm: ElevationRaster<B>,
    /// Terrain used under test objects. The evaluator passes the reference
    /// DTM so that terrain modeling error does not leak into object scores.
    pub test_dtm: ElevationRaster<B>,
    pub test_mask: Mask<B>,
    pub geotransform: GeoTransform,
    pub ignore_mask: Mask<B>,
}

/// Inputs of the relative accuracy metric for one match-value pair.
#[derive(Debug, Clone)]
pub struct RelativeAccuracyInput<B: Backend> {
    pub reference_dsm: ElevationRaster<B>,
    pub test_dsm: ElevationRaster<B>,
    pub reference_mask: Mask<B>,
    pub test_mask: Mask<B>,
    pub ignore_mask: Mask<B>,
    /// Horizontal ground size of one pixel.
    pub unit_width: f64,
}

/// Inputs of the terrain accuracy metric.
#[derive(Debug, Clone)]
pub struct TerrainAccuracyInput<B: Backend> {
    pub reference_dtm: ElevationRaster<B>,
    pub test_dtm: ElevationRaster<B>,
    /// Pixels whose terrain is not expected to be observable (e.g. under buildings).
    pub reference_mask: Mask<B>,
    pub z_threshold: f64,
}

impl<B: Backend> TerrainAccuracyInput<B> {
    pub const fn new(
        reference_dtm: ElevationRaster<B>,
        test_dtm: ElevationRaster<B>,
        reference_mask: Mask<B>,
        z_threshold: f64,
    ) -> Self {
        Self {
            reference_dtm,
            test_dtm,
            reference_mask,
            z_threshold,
        }
    }
}
