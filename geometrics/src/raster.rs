//! Raster conventions shared by the evaluation stages.
//!
//! Label layers (structure index, material, classification) are integer
//! tensors, elevation layers are float tensors and region masks are boolean
//! tensors, all of shape `[rows, cols]`. Every raster of one evaluation run
//! shares the same shape and pixel alignment; the entry points check the
//! shapes and never resample.

use std::collections::BTreeSet;

use burn::{
    prelude::*,
    tensor::{backend::Backend, ElementConversion},
};
use serde::{Deserialize, Serialize};

use crate::error::{GeometricsError, GeometricsResult};

/// Structure-index value meaning "not part of any structure".
pub const NO_STRUCTURE: i64 = 0;

/// Serialized form of "no valid material" for a structure's primary material.
pub const NO_MATERIAL: i64 = -1;

/// No-data value assigned to elevation pixels that could not be filled.
pub const DEFAULT_NO_DATA: f64 = -9999.0;

/// Integer label raster.
pub type LabelRaster<B> = Tensor<B, 2, Int>;

/// Floating point elevation raster.
pub type ElevationRaster<B> = Tensor<B, 2>;

/// Boolean region mask.
pub type Mask<B> = Tensor<B, 2, Bool>;

/// Fail with `ShapeMismatch` unless `actual` equals `expected`.
pub fn ensure_shape(layer: &str, expected: [usize; 2], actual: [usize; 2]) -> GeometricsResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(GeometricsError::ShapeMismatch {
            layer: layer.to_string(),
            expected,
            actual,
        })
    }
}

/// Sorted distinct values of a label raster.
pub fn unique_values<B: Backend>(raster: &LabelRaster<B>) -> Vec<i64> {
    let values: BTreeSet<i64> = raster.to_data().iter::<i64>().collect();
    values.into_iter().collect()
}

/// Number of `true` pixels in a mask.
pub fn count_true<B: Backend>(mask: &Mask<B>) -> usize {
    let count = mask.clone().int().sum().into_scalar().elem::<i64>();
    usize::try_from(count).unwrap_or(0)
}

/// An all-`false` mask of the given shape.
pub fn empty_mask<B: Backend>(shape: [usize; 2], device: &B::Device) -> Mask<B> {
    let [rows, cols] = shape;
    Tensor::from_data(TensorData::new(vec![false; rows * cols], [rows, cols]), device)
}

/// Row-major copy of a label raster, indexed by `(x, y)` = (column, row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    rows: usize,
    cols: usize,
    values: Vec<i64>,
}

impl LabelGrid {
    /// Copy a label tensor into host memory.
    pub fn from_tensor<B: Backend>(raster: &LabelRaster<B>) -> Self {
        let [rows, cols] = raster.dims();
        Self {
            rows,
            cols,
            values: raster.to_data().iter::<i64>().collect(),
        }
    }

    /// Build a grid from row-major values.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `values` does not hold `rows * cols` entries.
    pub fn from_vec(rows: usize, cols: usize, values: Vec<i64>) -> GeometricsResult<Self> {
        if values.len() != rows * cols {
            return Err(GeometricsError::ShapeMismatch {
                layer: "label grid".to_string(),
                expected: [rows, cols],
                actual: [values.len() / cols.max(1), cols],
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// `[rows, cols]`.
    #[must_use]
    pub const fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Value at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> i64 {
        self.values[y * self.cols + x]
    }

    /// Row-major values.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// Affine pixel-to-ground transform in GDAL coefficient order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [f64; 6]);

impl Default for GeoTransform {
    fn default() -> Self {
        Self([0.0, 1.0, 0.0, 0.0, 0.0, -1.0])
    }
}

impl GeoTransform {
    /// Ground size of one pixel along x.
    #[must_use]
    pub fn unit_width(&self) -> f64 {
        self.0[1].abs()
    }

    /// Ground size of one pixel along y.
    #[must_use]
    pub fn unit_height(&self) -> f64 {
        self.0[5].abs()
    }
}
