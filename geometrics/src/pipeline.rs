//! End-to-end evaluation of one test model against the reference model.

use burn::tensor::backend::Backend;

use crate::{
    config::EvaluationConfig,
    error::GeometricsResult,
    evaluation::{
        run_terrain_accuracy, MultiThresholdEvaluator, RelativeAccuracyMetric,
        TerrainAccuracyMetric, ThresholdGeometryMetric, ThresholdLayers,
    },
    masks::{validate_match_values, ClassMaskBuilder, Side},
    materials::run_material_metrics,
    preparation::{
        apply_vertical_offset, build_ignore_mask, quantize_heights, NoDataValues, VoidLayers,
    },
    raster::{ensure_shape, unique_values, ElevationRaster, GeoTransform, LabelRaster},
    report::GeometricsReport,
};

/// Co-registered rasters of one evaluation run, all of the reference CLS shape.
#[derive(Debug, Clone)]
pub struct EvaluationInputs<B: Backend> {
    pub reference_dsm: ElevationRaster<B>,
    pub reference_dtm: ElevationRaster<B>,
    pub reference_cls: LabelRaster<B>,
    /// Structure-index raster; material scoring needs it.
    pub reference_index: Option<LabelRaster<B>>,
    pub reference_materials: Option<LabelRaster<B>>,
    pub test_dsm: ElevationRaster<B>,
    pub test_dtm: Option<ElevationRaster<B>>,
    pub test_cls: LabelRaster<B>,
    pub test_materials: Option<LabelRaster<B>>,
    pub geotransform: GeoTransform,
    pub no_data: NoDataValues,
    /// Registration offset `[x, y, z]`; rasters are expected to be warped by
    /// `x` and `y` already, only `z` is applied here.
    pub registration_offset: Option<[f64; 3]>,
}

impl<B: Backend> EvaluationInputs<B> {
    fn check_shapes(&self) -> GeometricsResult<()> {
        let shape = self.reference_cls.dims();
        ensure_shape("reference DSM", shape, self.reference_dsm.dims())?;
        ensure_shape("reference DTM", shape, self.reference_dtm.dims())?;
        ensure_shape("test DSM", shape, self.test_dsm.dims())?;
        ensure_shape("test CLS", shape, self.test_cls.dims())?;
        let optional = [
            ("reference NDX", self.reference_index.as_ref().map(|t| t.dims())),
            ("reference MTL", self.reference_materials.as_ref().map(|t| t.dims())),
            ("test DTM", self.test_dtm.as_ref().map(|t| t.dims())),
            ("test MTL", self.test_materials.as_ref().map(|t| t.dims())),
        ];
        for (layer, dims) in optional {
            if let Some(dims) = dims {
                ensure_shape(layer, shape, dims)?;
            }
        }
        Ok(())
    }
}

/// Metric implementations used by [`run_evaluation`].
pub struct MetricSuite<'a, B: Backend> {
    pub geometry: &'a dyn ThresholdGeometryMetric<B>,
    pub relative: &'a dyn RelativeAccuracyMetric<B>,
    pub terrain: &'a dyn TerrainAccuracyMetric<B>,
}

/// Run every evaluation stage the inputs allow.
///
/// Configuration, shapes, class match values and terrain classes are all
/// validated before the first metric runs, so a misconfigured run never
/// produces partial results. Terrain accuracy is skipped without a test DTM,
/// material scoring without the index and both material rasters.
///
/// # Errors
///
/// Returns the first validation error, `AllPixelsIgnored`, or a metric failure.
pub fn run_evaluation<B: Backend>(
    inputs: EvaluationInputs<B>,
    config: &EvaluationConfig,
    metrics: &MetricSuite<'_, B>,
) -> GeometricsResult<GeometricsReport> {
    config.validate()?;
    inputs.check_shapes()?;

    let masks = ClassMaskBuilder::new(&config.classes, &inputs.reference_cls, &inputs.test_cls)?;
    if inputs.test_dtm.is_some() {
        validate_match_values(
            &config.options.terrain_cls_ignore_values,
            &unique_values(&inputs.reference_cls),
            Side::Reference,
        )?;
    }

    let EvaluationInputs {
        mut reference_dsm,
        mut reference_dtm,
        reference_cls,
        reference_index,
        reference_materials,
        test_dsm,
        test_dtm,
        test_cls,
        test_materials,
        geotransform,
        no_data,
        registration_offset,
    } = inputs;

    let z_offset = registration_offset.map_or(0.0, |[_, _, z]| z);
    let shifted = apply_vertical_offset(test_dsm, test_dtm, z_offset, no_data.elevation);
    let mut test_dsm = shifted.test_dsm;
    let mut test_dtm = shifted.test_dtm;

    let ignore = build_ignore_mask(
        &VoidLayers {
            reference_dsm: &reference_dsm,
            reference_dtm: &reference_dtm,
            reference_cls: &reference_cls,
            test_dsm: &test_dsm,
            test_dtm: test_dtm.as_ref(),
            test_cls: &test_cls,
        },
        &no_data,
        &config.options.test_ignore,
    )?;

    if config.options.quantize_height {
        let unit = geotransform.unit_height();
        tracing::info!(unit, "quantizing heights");
        reference_dsm = quantize_heights(reference_dsm, unit);
        reference_dtm = quantize_heights(reference_dtm, unit);
        test_dsm = quantize_heights(test_dsm, unit);
        test_dtm = test_dtm.map(|dtm| quantize_heights(dtm, unit));
    }

    let layers = ThresholdLayers {
        reference_dsm,
        reference_dtm,
        reference_cls,
        test_dsm,
        test_cls,
        ignore_mask: ignore.mask,
        geotransform,
    };
    let threshold = MultiThresholdEvaluator::new(metrics.geometry, metrics.relative)
        .evaluate(&masks, &layers)?;

    let terrain_accuracy = match &test_dtm {
        Some(test_dtm) => Some(run_terrain_accuracy(
            metrics.terrain,
            &layers.reference_dtm,
            test_dtm,
            &layers.reference_cls,
            &config.options,
        )?),
        None => {
            tracing::warn!("no test DTM, skipping terrain accuracy metrics");
            None
        }
    };

    let threshold_materials = match (&reference_index, &reference_materials, &test_materials) {
        (Some(index), Some(truth), Some(test)) => {
            Some(run_material_metrics(index, truth, test, &config.materials)?)
        }
        _ => {
            tracing::warn!("no structure index or material rasters, skipping material metrics");
            None
        }
    };

    Ok(GeometricsReport {
        threshold_geometry: threshold.threshold_geometry,
        relative_accuracy: threshold.relative_accuracy,
        registration_offset,
        terrain_accuracy,
        threshold_materials,
        data_voids: ignore.data_voids,
    })
}
