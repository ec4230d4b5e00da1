//! Raster preparation before scoring: data-void masks, vertical registration
//! offset and height quantization.

use burn::{prelude::*, tensor::backend::Backend};
use serde::{Deserialize, Serialize};

use crate::{
    config::TestIgnoreMode,
    error::{GeometricsError, GeometricsResult},
    raster::{count_true, empty_mask, ensure_shape, ElevationRaster, LabelRaster, Mask, DEFAULT_NO_DATA},
};

/// No-data values of the input layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoDataValues {
    /// Value of unfilled DSM/DTM pixels, reference and test alike.
    pub elevation: f64,
    pub reference_cls: Option<i64>,
    pub test_cls: Option<i64>,
}

impl Default for NoDataValues {
    fn default() -> Self {
        Self {
            elevation: DEFAULT_NO_DATA,
            reference_cls: None,
            test_cls: None,
        }
    }
}

/// Layers inspected for data voids.
#[derive(Debug, Clone)]
pub struct VoidLayers<'a, B: Backend> {
    pub reference_dsm: &'a ElevationRaster<B>,
    pub reference_dtm: &'a ElevationRaster<B>,
    pub reference_cls: &'a LabelRaster<B>,
    pub test_dsm: &'a ElevationRaster<B>,
    pub test_dtm: Option<&'a ElevationRaster<B>>,
    pub test_cls: &'a LabelRaster<B>,
}

/// Pixels excluded from every metric.
#[derive(Debug, Clone)]
pub struct IgnoreMask<B: Backend> {
    pub mask: Mask<B>,
    pub data_voids: usize,
}

/// Mark reference data voids, and test data voids according to `mode`.
///
/// # Errors
///
/// Returns `ShapeMismatch` if the layers disagree in shape and
/// `AllPixelsIgnored` if no pixel is left to evaluate.
pub fn build_ignore_mask<B: Backend>(
    layers: &VoidLayers<'_, B>,
    no_data: &NoDataValues,
    mode: &TestIgnoreMode,
) -> GeometricsResult<IgnoreMask<B>> {
    let shape = layers.reference_cls.dims();
    ensure_shape("reference DSM", shape, layers.reference_dsm.dims())?;
    ensure_shape("reference DTM", shape, layers.reference_dtm.dims())?;
    ensure_shape("test DSM", shape, layers.test_dsm.dims())?;
    ensure_shape("test CLS", shape, layers.test_cls.dims())?;
    if let Some(test_dtm) = layers.test_dtm {
        ensure_shape("test DTM", shape, test_dtm.dims())?;
    }

    let mut mask = empty_mask::<B>(shape, &layers.reference_cls.device())
        .bool_or(layers.reference_dsm.clone().equal_elem(no_data.elevation))
        .bool_or(layers.reference_dtm.clone().equal_elem(no_data.elevation));
    if let Some(value) = no_data.reference_cls {
        mask = mask.bool_or(layers.reference_cls.clone().equal_elem(value));
    }

    match mode {
        TestIgnoreMode::Off => {}
        TestIgnoreMode::Classification => {
            if let Some(value) = no_data.test_cls {
                tracing::info!(value, "ignoring test CLS no-data value");
                mask = mask.bool_or(layers.test_cls.clone().equal_elem(value));
            }
        }
        TestIgnoreMode::Elevation => {
            tracing::info!("ignoring test DSM no-data value");
            mask = mask.bool_or(layers.test_dsm.clone().equal_elem(no_data.elevation));
            if let Some(test_dtm) = layers.test_dtm {
                tracing::info!("ignoring test DTM no-data value");
                mask = mask.bool_or(test_dtm.clone().equal_elem(no_data.elevation));
            }
        }
    }

    let data_voids = count_true(&mask);
    let [rows, cols] = shape;
    if data_voids == rows * cols {
        return Err(GeometricsError::AllPixelsIgnored);
    }
    tracing::info!(data_voids, "data voids in ignore mask");

    Ok(IgnoreMask { mask, data_voids })
}

/// Test elevation layers after the vertical registration offset.
#[derive(Debug, Clone)]
pub struct OffsetLayers<B: Backend> {
    pub test_dsm: ElevationRaster<B>,
    pub test_dtm: Option<ElevationRaster<B>>,
    /// Pixels where every supplied test layer holds data.
    pub valid: Mask<B>,
}

/// Add `z_offset` to the test layers where they hold data.
///
/// No-data pixels keep their value so that they can still be recognized.
pub fn apply_vertical_offset<B: Backend>(
    test_dsm: ElevationRaster<B>,
    test_dtm: Option<ElevationRaster<B>>,
    z_offset: f64,
    no_data: f64,
) -> OffsetLayers<B> {
    let mut valid = test_dsm.clone().not_equal_elem(no_data);
    if let Some(dtm) = &test_dtm {
        valid = valid.bool_and(dtm.clone().not_equal_elem(no_data));
    }

    let shift = |layer: ElevationRaster<B>| {
        layer
            .clone()
            .mask_where(valid.clone(), layer.add_scalar(z_offset))
    };
    let test_dsm = shift(test_dsm);
    let test_dtm = test_dtm.map(shift);

    OffsetLayers {
        test_dsm,
        test_dtm,
        valid,
    }
}

/// Round heights to multiples of `unit_height`.
#[must_use]
pub fn quantize_heights<B: Backend>(layer: ElevationRaster<B>, unit_height: f64) -> ElevationRaster<B> {
    layer
        .div_scalar(unit_height)
        .round()
        .mul_scalar(unit_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    const ND: f64 = DEFAULT_NO_DATA;

    fn elevation(values: Vec<f32>) -> ElevationRaster<TestBackend> {
        Tensor::from_data(TensorData::new(values, [2, 2]), &Default::default())
    }

    fn labels(values: Vec<i64>) -> LabelRaster<TestBackend> {
        Tensor::from_data(TensorData::new(values, [2, 2]), &Default::default())
    }

    fn mask_values(mask: Mask<TestBackend>) -> Vec<bool> {
        mask.into_data().iter::<bool>().collect()
    }

    #[test]
    fn test_reference_voids_and_modes() {
        let nd = ND as f32;
        let reference_dsm = elevation(vec![nd, 1.0, 1.0, 1.0]);
        let reference_dtm = elevation(vec![0.0, nd, 0.0, 0.0]);
        let reference_cls = labels(vec![2, 2, 65, 2]);
        let test_dsm = elevation(vec![1.0, 1.0, 1.0, nd]);
        let test_cls = labels(vec![0, 0, 0, 0]);
        let layers = VoidLayers {
            reference_dsm: &reference_dsm,
            reference_dtm: &reference_dtm,
            reference_cls: &reference_cls,
            test_dsm: &test_dsm,
            test_dtm: None,
            test_cls: &test_cls,
        };
        let no_data = NoDataValues {
            reference_cls: Some(65),
            test_cls: Some(0),
            ..NoDataValues::default()
        };

        let off = build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Off).unwrap();
        assert_eq!(mask_values(off.mask), vec![true, true, true, false]);
        assert_eq!(off.data_voids, 3);

        let elevation_mode = build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Elevation);
        assert!(matches!(
            elevation_mode,
            Err(GeometricsError::AllPixelsIgnored)
        ));

        let cls_mode = build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Classification);
        assert!(matches!(cls_mode, Err(GeometricsError::AllPixelsIgnored)));
    }

    #[test]
    fn test_test_dtm_voids_only_in_elevation_mode() {
        let nd = ND as f32;
        let reference_dsm = elevation(vec![5.0; 4]);
        let reference_dtm = elevation(vec![0.0; 4]);
        let reference_cls = labels(vec![2, 6, 6, 2]);
        let test_dsm = elevation(vec![5.0; 4]);
        let test_dtm = elevation(vec![0.0, 0.0, nd, 0.0]);
        let test_cls = labels(vec![2, 6, 6, 2]);
        let layers = VoidLayers {
            reference_dsm: &reference_dsm,
            reference_dtm: &reference_dtm,
            reference_cls: &reference_cls,
            test_dsm: &test_dsm,
            test_dtm: Some(&test_dtm),
            test_cls: &test_cls,
        };
        let no_data = NoDataValues::default();

        let off = build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Off).unwrap();
        assert_eq!(off.data_voids, 0);

        let cls_mode =
            build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Classification).unwrap();
        assert_eq!(cls_mode.data_voids, 0);

        let elevation_mode =
            build_ignore_mask(&layers, &no_data, &TestIgnoreMode::Elevation).unwrap();
        assert_eq!(
            mask_values(elevation_mode.mask),
            vec![false, false, true, false]
        );
        assert_eq!(elevation_mode.data_voids, 1);
    }

    #[test]
    fn test_offset_only_touches_valid_pixels() {
        let nd = ND as f32;
        let dsm = elevation(vec![10.0, nd, 12.0, 13.0]);
        let dtm = elevation(vec![1.0, 2.0, nd, 4.0]);

        let shifted = apply_vertical_offset(dsm, Some(dtm), 0.5, ND);

        let dsm: Vec<f32> = shifted.test_dsm.into_data().iter::<f32>().collect();
        let dtm: Vec<f32> = shifted.test_dtm.unwrap().into_data().iter::<f32>().collect();
        assert_eq!(dsm, vec![10.5, nd, 12.0, 13.5]);
        assert_eq!(dtm, vec![1.5, 2.0, nd, 4.5]);
        assert_eq!(mask_values(shifted.valid), vec![true, false, false, true]);
    }

    #[test]
    fn test_quantize_heights() {
        let layer = elevation(vec![1.2, 1.3, -0.6, 2.0]);
        let values: Vec<f32> = quantize_heights(layer, 0.5).into_data().iter::<f32>().collect();
        assert_eq!(values, vec![1.0, 1.5, -0.5, 2.0]);
    }
}
