//! Terrain accuracy dispatch.

use burn::tensor::backend::Backend;

use super::{
    input::{MetricRecord, TerrainAccuracyInput},
    metric::TerrainAccuracyMetric,
};
use crate::{
    config::{MatchValue, OptionsConfig},
    error::GeometricsResult,
    masks::{class_mask, validate_match_values, Side},
    raster::{ensure_shape, unique_values, ElevationRaster, LabelRaster, Mask},
};

/// Reference pixels whose class hides the terrain, such as buildings and bridge decks.
///
/// # Errors
///
/// Returns `UnmatchedClassValue` if a configured class does not occur in `reference_cls`.
pub fn terrain_mask<B: Backend>(
    reference_cls: &LabelRaster<B>,
    values: &[MatchValue],
) -> GeometricsResult<Mask<B>> {
    let sets = validate_match_values(values, &unique_values(reference_cls), Side::Reference)?;
    let codes: Vec<i64> = sets.into_iter().flatten().collect();
    Ok(class_mask(reference_cls, &codes))
}

/// Run the terrain metric on reference and test DTMs.
///
/// # Errors
///
/// Returns `ShapeMismatch` or `UnmatchedClassValue` before the metric runs,
/// and forwards metric failures.
pub fn run_terrain_accuracy<B: Backend>(
    metric: &dyn TerrainAccuracyMetric<B>,
    reference_dtm: &ElevationRaster<B>,
    test_dtm: &ElevationRaster<B>,
    reference_cls: &LabelRaster<B>,
    options: &OptionsConfig,
) -> GeometricsResult<MetricRecord> {
    let shape = reference_cls.dims();
    ensure_shape("reference DTM", shape, reference_dtm.dims())?;
    ensure_shape("test DTM", shape, test_dtm.dims())?;

    let mask = terrain_mask(reference_cls, &options.terrain_cls_ignore_values)?;
    tracing::info!(
        metric = %metric.name(),
        threshold = options.terrain_z_error_threshold,
        "running terrain accuracy"
    );
    metric.evaluate(&TerrainAccuracyInput::new(
        reference_dtm.clone(),
        test_dtm.clone(),
        mask,
        options.terrain_z_error_threshold,
    ))
}
