//! Multi-threshold evaluation over paired class match values.

use burn::tensor::backend::Backend;
use serde::Serialize;

use super::{
    input::{MetricRecord, RelativeAccuracyInput, ThresholdGeometryInput},
    metric::{RelativeAccuracyMetric, ThresholdGeometryMetric},
};
use crate::{
    error::GeometricsResult,
    masks::{ClassMaskBuilder, ClsValue},
    raster::{count_true, ensure_shape, ElevationRaster, GeoTransform, LabelRaster, Mask},
};

/// A metric record tagged with the match values that produced its masks.
#[derive(Debug, Clone, Serialize)]
pub struct TaggedResult {
    #[serde(flatten)]
    pub metrics: MetricRecord,
    #[serde(rename = "CLSValue")]
    pub cls_value: ClsValue,
}

impl TaggedResult {
    /// Attach `cls_value`, replacing any tag the metric set itself.
    #[must_use]
    pub fn new(mut metrics: MetricRecord, cls_value: ClsValue) -> Self {
        metrics.remove("CLSValue");
        Self { metrics, cls_value }
    }
}

/// Results of all match-value pairs, in configured pair order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThresholdResults {
    pub threshold_geometry: Vec<TaggedResult>,
    /// Shorter than `threshold_geometry` when pairs were skipped.
    pub relative_accuracy: Vec<TaggedResult>,
}

/// Rasters shared by every match-value pair.
#[derive(Debug, Clone)]
pub struct ThresholdLayers<B: Backend> {
    pub reference_dsm: ElevationRaster<B>,
    pub reference_dtm: ElevationRaster<B>,
    pub reference_cls: LabelRaster<B>,
    pub test_dsm: ElevationRaster<B>,
    pub test_cls: LabelRaster<B>,
    pub ignore_mask: Mask<B>,
    pub geotransform: GeoTransform,
}

impl<B: Backend> ThresholdLayers<B> {
    fn check_shapes(&self) -> GeometricsResult<()> {
        let shape = self.reference_cls.dims();
        ensure_shape("reference DSM", shape, self.reference_dsm.dims())?;
        ensure_shape("reference DTM", shape, self.reference_dtm.dims())?;
        ensure_shape("test DSM", shape, self.test_dsm.dims())?;
        ensure_shape("test CLS", shape, self.test_cls.dims())?;
        ensure_shape("ignore mask", shape, self.ignore_mask.dims())
    }
}

/// Runs the geometry and relative accuracy metrics for every match-value pair.
pub struct MultiThresholdEvaluator<'a, B: Backend> {
    geometry: &'a dyn ThresholdGeometryMetric<B>,
    relative: &'a dyn RelativeAccuracyMetric<B>,
}

impl<'a, B: Backend> MultiThresholdEvaluator<'a, B> {
    pub fn new(
        geometry: &'a dyn ThresholdGeometryMetric<B>,
        relative: &'a dyn RelativeAccuracyMetric<B>,
    ) -> Self {
        Self { geometry, relative }
    }

    /// Evaluate every validated pair of `masks` in order.
    ///
    /// The geometry metric runs for every pair with the reference DTM standing
    /// in for the test DTM. The relative accuracy metric runs only when
    /// neither mask covers the whole raster and the test set is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` before any metric runs if the layers disagree
    /// in shape, and forwards metric failures.
    pub fn evaluate(
        &self,
        masks: &ClassMaskBuilder,
        layers: &ThresholdLayers<B>,
    ) -> GeometricsResult<ThresholdResults> {
        layers.check_shapes()?;
        let [rows, cols] = layers.reference_cls.dims();
        let pixel_count = rows * cols;
        let unit_width = layers.geotransform.unit_width();

        let mut results = ThresholdResults::default();
        for (index, pair) in masks.pairs().iter().enumerate() {
            tracing::info!(
                index,
                reference = ?pair.reference,
                test = ?pair.test,
                "evaluating CLS values"
            );
            let (reference_mask, test_mask) =
                ClassMaskBuilder::masks(pair, &layers.reference_cls, &layers.test_cls);

            let geometry_input = ThresholdGeometryInput {
                reference_dsm: layers.reference_dsm.clone(),
                reference_dtm: layers.reference_dtm.clone(),
                reference_mask: reference_mask.clone(),
                test_dsm: layers.test_dsm.clone(),
                test_dtm: layers.reference_dtm.clone(),
                test_mask: test_mask.clone(),
                geotransform: layers.geotransform,
                ignore_mask: layers.ignore_mask.clone(),
            };
            let record = self.geometry.evaluate(&geometry_input)?;
            results
                .threshold_geometry
                .push(TaggedResult::new(record, pair.cls_value()));

            let reference_full = count_true(&reference_mask) == pixel_count;
            let test_full = count_true(&test_mask) == pixel_count;
            if reference_full || test_full || pair.test.is_empty() {
                tracing::debug!(
                    index,
                    reference_full,
                    test_full,
                    metric = %self.relative.name(),
                    "skipping relative accuracy"
                );
                continue;
            }

            let relative_input = RelativeAccuracyInput {
                reference_dsm: layers.reference_dsm.clone(),
                test_dsm: layers.test_dsm.clone(),
                reference_mask,
                test_mask,
                ignore_mask: layers.ignore_mask.clone(),
                unit_width,
            };
            let record = self.relative.evaluate(&relative_input)?;
            results
                .relative_accuracy
                .push(TaggedResult::new(record, pair.cls_value()));
        }

        Ok(results)
    }
}
