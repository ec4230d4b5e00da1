//! Relative elevation accuracy of matched objects.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use serde_json::json;

use super::utils::{error_stats, optional};
use crate::{
    error::GeometricsResult,
    evaluation::{MetricRecord, RelativeAccuracyInput, RelativeAccuracyMetric},
};

/// Height error statistics over pixels labeled as object in both models.
///
/// Errors are `test - reference`, so a positive bias means the test surface
/// lies above the reference.
#[derive(Debug, Clone, Default)]
pub struct ElevationAccuracyMetric<B: Backend> {
    _b: PhantomData<B>,
}

impl<B: Backend> ElevationAccuracyMetric<B> {
    pub const fn new() -> Self {
        Self { _b: PhantomData }
    }
}

impl<B: Backend> RelativeAccuracyMetric<B> for ElevationAccuracyMetric<B> {
    fn name(&self) -> String {
        "relative accuracy".to_string()
    }

    fn evaluate(&self, input: &RelativeAccuracyInput<B>) -> GeometricsResult<MetricRecord> {
        let matched = input
            .reference_mask
            .clone()
            .bool_and(input.test_mask.clone())
            .bool_and(input.ignore_mask.clone().bool_not());
        let errors = input.test_dsm.clone() - input.reference_dsm.clone();
        let (count, bias, mae, rms) = error_stats(errors, matched);

        let mut record = MetricRecord::new();
        record.insert("matched_pixels".to_string(), json!(count));
        record.insert("z_bias".to_string(), optional(bias));
        record.insert("z_mae".to_string(), optional(mae));
        record.insert("z_rms".to_string(), optional(rms));
        record.insert("unit_width".to_string(), json!(input.unit_width));
        Ok(record)
    }
}
