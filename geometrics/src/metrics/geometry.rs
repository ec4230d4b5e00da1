//! Pixel-based threshold geometry metric.
//!
//! 2D scores compare the object masks pixel by pixel; 3D scores weight every
//! object pixel by its height above terrain, so that missing or extra height
//! is penalized as well as missing or extra footprint.

use std::marker::PhantomData;

use burn::{prelude::*, tensor::backend::Backend};
use serde_json::json;

use super::utils::{f_score, masked_sum, optional, ratio};
use crate::{
    error::GeometricsResult,
    evaluation::{MetricRecord, ThresholdGeometryInput, ThresholdGeometryMetric},
    raster::count_true,
};

#[derive(Config, Debug)]
pub struct PixelGeometryMetricConfig {
    /// Add the height-weighted 3D scores to the record.
    #[config(default = true)]
    pub volumetric: bool,
}

/// Completeness, correctness, F-score and Jaccard index of object masks.
#[derive(Debug, Clone)]
pub struct PixelGeometryMetric<B: Backend> {
    volumetric: bool,
    _b: PhantomData<B>,
}

impl PixelGeometryMetricConfig {
    pub fn init<B: Backend>(&self) -> PixelGeometryMetric<B> {
        PixelGeometryMetric {
            volumetric: self.volumetric,
            _b: PhantomData,
        }
    }
}

impl<B: Backend> Default for PixelGeometryMetric<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> PixelGeometryMetric<B> {
    pub fn new() -> Self {
        PixelGeometryMetricConfig::new().init()
    }

    fn scores_2d(input: &ThresholdGeometryInput<B>) -> serde_json::Value {
        let valid = input.ignore_mask.clone().bool_not();
        let reference = input.reference_mask.clone().bool_and(valid.clone());
        let test = input.test_mask.clone().bool_and(valid);

        let tp = count_true(&reference.clone().bool_and(test.clone())) as f64;
        let fp = count_true(&test.clone().bool_and(reference.clone().bool_not())) as f64;
        let fn_val = count_true(&reference.bool_and(test.bool_not())) as f64;

        let completeness = ratio(tp, tp + fn_val);
        let correctness = ratio(tp, tp + fp);
        json!({
            "completeness": optional(completeness),
            "correctness": optional(correctness),
            "f_score": optional(f_score(correctness, completeness)),
            "jaccard_index": optional(ratio(tp, tp + fp + fn_val)),
            "true_positives": tp,
            "false_positives": fp,
            "false_negatives": fn_val,
        })
    }

    fn scores_3d(input: &ThresholdGeometryInput<B>) -> serde_json::Value {
        let valid = input.ignore_mask.clone().bool_not();
        let pixel_area = input.geotransform.unit_width() * input.geotransform.unit_height();

        let reference_height = (input.reference_dsm.clone() - input.reference_dtm.clone())
            .clamp_min(0.0)
            .mask_fill(input.reference_mask.clone().bool_not(), 0.0);
        let test_height = (input.test_dsm.clone() - input.test_dtm.clone())
            .clamp_min(0.0)
            .mask_fill(input.test_mask.clone().bool_not(), 0.0);
        let overlap = reference_height.clone().min_pair(test_height.clone());

        let reference_volume = masked_sum(reference_height, valid.clone()) * pixel_area;
        let test_volume = masked_sum(test_height, valid.clone()) * pixel_area;
        let overlap_volume = masked_sum(overlap, valid) * pixel_area;

        let completeness = ratio(overlap_volume, reference_volume);
        let correctness = ratio(overlap_volume, test_volume);
        json!({
            "completeness": optional(completeness),
            "correctness": optional(correctness),
            "f_score": optional(f_score(correctness, completeness)),
            "jaccard_index": optional(ratio(
                overlap_volume,
                reference_volume + test_volume - overlap_volume
            )),
            "reference_volume": reference_volume,
            "test_volume": test_volume,
        })
    }
}

impl<B: Backend> ThresholdGeometryMetric<B> for PixelGeometryMetric<B> {
    fn name(&self) -> String {
        "threshold geometry".to_string()
    }

    fn evaluate(&self, input: &ThresholdGeometryInput<B>) -> GeometricsResult<MetricRecord> {
        let mut record = MetricRecord::new();
        record.insert("2D".to_string(), Self::scores_2d(input));
        if self.volumetric {
            record.insert("3D".to_string(), Self::scores_3d(input));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::GeoTransform;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn mask(values: Vec<bool>) -> Tensor<TestBackend, 2, Bool> {
        Tensor::from_data(TensorData::new(values, [2, 2]), &Default::default())
    }

    fn heights(values: Vec<f32>) -> Tensor<TestBackend, 2> {
        Tensor::from_data(TensorData::new(values, [2, 2]), &Default::default())
    }

    fn input(
        reference_mask: Vec<bool>,
        test_mask: Vec<bool>,
        ignore_mask: Vec<bool>,
    ) -> ThresholdGeometryInput<TestBackend> {
        ThresholdGeometryInput {
            reference_dsm: heights(vec![10.0, 10.0, 4.0, 0.0]),
            reference_dtm: heights(vec![0.0; 4]),
            reference_mask: mask(reference_mask),
            test_dsm: heights(vec![10.0, 5.0, 4.0, 0.0]),
            test_dtm: heights(vec![0.0; 4]),
            test_mask: mask(test_mask),
            geotransform: GeoTransform([0.0, 2.0, 0.0, 0.0, 0.0, -2.0]),
            ignore_mask: mask(ignore_mask),
        }
    }

    #[test]
    fn test_2d_scores() {
        let input = input(
            vec![true, true, false, false],
            vec![true, false, true, false],
            vec![false; 4],
        );
        let record = PixelGeometryMetric::<TestBackend>::new()
            .evaluate(&input)
            .unwrap();

        let scores = &record["2D"];
        assert_eq!(scores["completeness"], json!(0.5));
        assert_eq!(scores["correctness"], json!(0.5));
        assert_eq!(scores["f_score"], json!(0.5));
        assert!((scores["jaccard_index"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ignored_pixels_do_not_count() {
        let input = input(
            vec![true, true, false, false],
            vec![true, false, true, false],
            vec![false, true, true, false],
        );
        let record = PixelGeometryMetric::<TestBackend>::new()
            .evaluate(&input)
            .unwrap();

        assert_eq!(record["2D"]["completeness"], json!(1.0));
        assert_eq!(record["2D"]["correctness"], json!(1.0));
    }

    #[test]
    fn test_3d_scores_weight_by_height() {
        let input = input(
            vec![true, true, false, false],
            vec![true, true, false, false],
            vec![false; 4],
        );
        let record = PixelGeometryMetric::<TestBackend>::new()
            .evaluate(&input)
            .unwrap();

        let scores = &record["3D"];
        // reference volume (10 + 10) * 4, test (10 + 5) * 4, overlap 15 * 4.
        assert_eq!(scores["reference_volume"], json!(80.0));
        assert_eq!(scores["completeness"], json!(0.75));
        assert_eq!(scores["correctness"], json!(1.0));
    }

    #[test]
    fn test_empty_masks_give_null_scores() {
        let input = input(vec![false; 4], vec![false; 4], vec![false; 4]);
        let record = PixelGeometryMetricConfig::new()
            .with_volumetric(false)
            .init::<TestBackend>()
            .evaluate(&input)
            .unwrap();

        assert!(record["2D"]["completeness"].is_null());
        assert!(record.get("3D").is_none());
    }
}
