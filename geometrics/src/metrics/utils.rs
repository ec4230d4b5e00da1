//! Masked reductions shared by the metric implementations.

use burn::tensor::{backend::Backend, ElementConversion};
use serde_json::{json, Value};

use crate::raster::{count_true, ElevationRaster, Mask};

/// Sum of `values` over the pixels selected by `mask`.
pub fn masked_sum<B: Backend>(values: ElevationRaster<B>, mask: Mask<B>) -> f64 {
    values
        .mask_fill(mask.bool_not(), 0.0)
        .sum()
        .into_scalar()
        .elem::<f64>()
}

/// `numerator / denominator`, or `None` for an empty denominator.
#[must_use]
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0).then(|| numerator / denominator)
}

/// Harmonic mean of two fractions.
#[must_use]
pub fn f_score(precision: Option<f64>, recall: Option<f64>) -> Option<f64> {
    match (precision, recall) {
        (Some(p), Some(r)) => Some(if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }),
        _ => None,
    }
}

/// Error statistics of `errors` over the pixels selected by `mask`.
///
/// Returns `(count, mean, mean absolute, root mean square)`; the averages are
/// `None` when the mask is empty.
pub fn error_stats<B: Backend>(
    errors: ElevationRaster<B>,
    mask: Mask<B>,
) -> (usize, Option<f64>, Option<f64>, Option<f64>) {
    let count = count_true(&mask);
    let n = count as f64;
    let sum = masked_sum(errors.clone(), mask.clone());
    let abs_sum = masked_sum(errors.clone().abs(), mask.clone());
    let sq_sum = masked_sum(errors.powf_scalar(2.0), mask);
    (
        count,
        ratio(sum, n),
        ratio(abs_sum, n),
        ratio(sq_sum, n).map(f64::sqrt),
    )
}

/// JSON number, or `null` for an undefined value.
#[must_use]
pub fn optional(value: Option<f64>) -> Value {
    value.map_or(Value::Null, |v| json!(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::NdArray, prelude::*};

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_error_stats() {
        let device = Default::default();
        let errors = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![1.0_f32, -3.0, 100.0, 0.0], [2, 2]),
            &device,
        );
        let mask = Tensor::<TestBackend, 2, Bool>::from_data(
            TensorData::new(vec![true, true, false, false], [2, 2]),
            &device,
        );

        let (count, mean, mae, rms) = error_stats(errors, mask);
        assert_eq!(count, 2);
        assert!((mean.unwrap() + 1.0).abs() < 1e-6);
        assert!((mae.unwrap() - 2.0).abs() < 1e-6);
        assert!((rms.unwrap() - 5.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_ratios() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
        assert_eq!(f_score(Some(0.5), Some(0.5)), Some(0.5));
        assert_eq!(f_score(Some(0.0), Some(0.0)), Some(0.0));
        assert_eq!(f_score(None, Some(1.0)), None);
        assert!(optional(None).is_null());
    }
}
