//! Seams for the geometric metric implementations.
//!
//! The evaluator prepares masks and dispatches to these traits; which
//! algorithm computes completeness, correctness or height errors is up to the
//! implementation. [`crate::metrics`] provides pixel-based implementations.

use burn::tensor::backend::Backend;

use super::input::{
    MetricRecord, RelativeAccuracyInput, TerrainAccuracyInput, ThresholdGeometryInput,
};
use crate::error::GeometricsResult;

/// Completeness/correctness style scores of object masks.
pub trait ThresholdGeometryMetric<B: Backend> {
    fn name(&self) -> String;

    fn evaluate(&self, input: &ThresholdGeometryInput<B>) -> GeometricsResult<MetricRecord>;
}

/// Height and position accuracy of matched objects.
pub trait RelativeAccuracyMetric<B: Backend> {
    fn name(&self) -> String;

    fn evaluate(&self, input: &RelativeAccuracyInput<B>) -> GeometricsResult<MetricRecord>;
}

/// Terrain height error.
pub trait TerrainAccuracyMetric<B: Backend> {
    fn name(&self) -> String;

    fn evaluate(&self, input: &TerrainAccuracyInput<B>) -> GeometricsResult<MetricRecord>;
}
