//! Terrain height error metric.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use serde_json::json;

use super::utils::{error_stats, optional, ratio};
use crate::{
    error::GeometricsResult,
    evaluation::{MetricRecord, TerrainAccuracyInput, TerrainAccuracyMetric},
    raster::count_true,
};

/// DTM error statistics outside the masked reference classes.
#[derive(Debug, Clone, Default)]
pub struct TerrainErrorMetric<B: Backend> {
    _b: PhantomData<B>,
}

impl<B: Backend> TerrainErrorMetric<B> {
    pub const fn new() -> Self {
        Self { _b: PhantomData }
    }
}

impl<B: Backend> TerrainAccuracyMetric<B> for TerrainErrorMetric<B> {
    fn name(&self) -> String {
        "terrain accuracy".to_string()
    }

    fn evaluate(&self, input: &TerrainAccuracyInput<B>) -> GeometricsResult<MetricRecord> {
        let evaluated = input.reference_mask.clone().bool_not();
        let errors = input.test_dtm.clone() - input.reference_dtm.clone();
        let within = errors
            .clone()
            .abs()
            .lower_equal_elem(input.z_threshold)
            .bool_and(evaluated.clone());
        let within_count = count_true(&within);
        let (count, bias, mae, rms) = error_stats(errors, evaluated);

        let mut record = MetricRecord::new();
        record.insert("evaluated_pixels".to_string(), json!(count));
        record.insert("z_bias".to_string(), optional(bias));
        record.insert("z_mae".to_string(), optional(mae));
        record.insert("z_rms".to_string(), optional(rms));
        record.insert("z_threshold".to_string(), json!(input.z_threshold));
        record.insert(
            "fraction_within_threshold".to_string(),
            optional(ratio(within_count as f64, count as f64)),
        );
        Ok(record)
    }
}
