//! Class masks from configured match values.
//!
//! Match values are validated against the values actually present in each
//! classification raster before any mask is built: a configured code that
//! never occurs can never be matched and points at a configuration or data
//! error.

use std::fmt;

use burn::tensor::backend::Backend;
use serde::Serialize;

use crate::{
    config::{ClassConfig, MatchValue},
    error::{GeometricsError, GeometricsResult},
    raster::{empty_mask, ensure_shape, unique_values, LabelRaster, Mask},
};

/// Class codes evaluated together as one logical class.
pub type MatchSet = Vec<i64>;

/// Classification raster a match value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Test,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Match values recorded with each metric result.
///
/// Serializes as the plain code list when both sides use the same codes and
/// as `{"Ref": [...], "Test": [...]}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClsValue {
    Same(MatchSet),
    Pair {
        #[serde(rename = "Ref")]
        reference: MatchSet,
        #[serde(rename = "Test")]
        test: MatchSet,
    },
}

/// One positionally paired reference/test match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    pub reference: MatchSet,
    pub test: MatchSet,
}

impl MatchPair {
    /// Tag describing which match values produced this pair's masks.
    #[must_use]
    pub fn cls_value(&self) -> ClsValue {
        if self.reference == self.test {
            ClsValue::Same(self.reference.clone())
        } else {
            ClsValue::Pair {
                reference: self.reference.clone(),
                test: self.test.clone(),
            }
        }
    }
}

/// Expand configured match values into sets, checking each code against `observed`.
///
/// # Errors
///
/// Returns `UnmatchedClassValue` for the first code missing from `observed`.
pub fn validate_match_values(
    values: &[MatchValue],
    observed: &[i64],
    side: Side,
) -> GeometricsResult<Vec<MatchSet>> {
    values
        .iter()
        .map(|value| {
            let codes = value.codes();
            match codes.iter().find(|code| !observed.contains(code)) {
                Some(&missing) => Err(GeometricsError::UnmatchedClassValue {
                    side: side.to_string(),
                    value: missing,
                    observed: observed.to_vec(),
                }),
                None => Ok(codes),
            }
        })
        .collect()
}

/// Validate both match-value lists and pair them by position.
///
/// # Errors
///
/// Returns `MismatchedMatchSets` if the lists differ in length and
/// `UnmatchedClassValue` if a code does not occur in its raster.
pub fn match_value_sets(
    reference: &[MatchValue],
    test: &[MatchValue],
    reference_observed: &[i64],
    test_observed: &[i64],
) -> GeometricsResult<Vec<MatchPair>> {
    if reference.len() != test.len() {
        return Err(GeometricsError::MismatchedMatchSets {
            reference: reference.len(),
            test: test.len(),
        });
    }

    tracing::info!(values = ?reference_observed, "reference classification values");
    tracing::info!(values = ?test_observed, "test classification values");

    let reference = validate_match_values(reference, reference_observed, Side::Reference)?;
    let test = validate_match_values(test, test_observed, Side::Test)?;

    Ok(reference
        .into_iter()
        .zip(test)
        .map(|(reference, test)| MatchPair { reference, test })
        .collect())
}

/// Mask that is `true` wherever `raster` holds one of `codes`.
///
/// An empty code list yields an all-`false` mask.
pub fn class_mask<B: Backend>(raster: &LabelRaster<B>, codes: &[i64]) -> Mask<B> {
    codes.iter().fold(
        empty_mask(raster.dims(), &raster.device()),
        |mask, &code| mask.bool_or(raster.clone().equal_elem(code)),
    )
}

/// Builds paired reference/test masks for validated match sets.
#[derive(Debug, Clone)]
pub struct ClassMaskBuilder {
    pairs: Vec<MatchPair>,
}

impl ClassMaskBuilder {
    /// Validate `config` against the classification rasters.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch`, `MismatchedMatchSets` or `UnmatchedClassValue`.
    pub fn new<B: Backend>(
        config: &ClassConfig,
        reference: &LabelRaster<B>,
        test: &LabelRaster<B>,
    ) -> GeometricsResult<Self> {
        ensure_shape("test CLS", reference.dims(), test.dims())?;
        let pairs = match_value_sets(
            &config.reference,
            &config.test,
            &unique_values(reference),
            &unique_values(test),
        )?;
        Ok(Self { pairs })
    }

    /// Builder over already validated pairs.
    #[must_use]
    pub const fn from_pairs(pairs: Vec<MatchPair>) -> Self {
        Self { pairs }
    }

    /// Validated pairs in configured order.
    #[must_use]
    pub fn pairs(&self) -> &[MatchPair] {
        &self.pairs
    }

    /// Reference and test masks of one pair.
    pub fn masks<B: Backend>(
        pair: &MatchPair,
        reference: &LabelRaster<B>,
        test: &LabelRaster<B>,
    ) -> (Mask<B>, Mask<B>) {
        (class_mask(reference, &pair.reference), class_mask(test, &pair.test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::count_true;
    use burn::{backend::NdArray, prelude::*};

    type TestBackend = NdArray<f32>;

    fn labels(values: Vec<i64>, shape: [usize; 2]) -> LabelRaster<TestBackend> {
        Tensor::from_data(TensorData::new(values, shape), &Default::default())
    }

    fn mask_values(mask: Mask<TestBackend>) -> Vec<bool> {
        mask.into_data().iter::<bool>().collect()
    }

    #[test]
    fn test_class_mask_groups_codes() {
        let raster = labels(vec![2, 6, 17, 6, 0, 2], [2, 3]);
        let mask = class_mask(&raster, &[6, 17]);
        assert_eq!(
            mask_values(mask),
            vec![false, true, true, true, false, false]
        );
    }

    #[test]
    fn test_empty_match_set_gives_empty_mask() {
        let raster = labels(vec![6; 12], [3, 4]);
        let mask = class_mask(&raster, &[]);
        assert_eq!(mask.dims(), [3, 4]);
        assert_eq!(count_true(&mask), 0);
    }

    #[test]
    fn test_unmatched_value_is_rejected() {
        let values = vec![MatchValue::Single(6), MatchValue::Group(vec![2, 9])];
        match validate_match_values(&values, &[0, 2, 6], Side::Test) {
            Err(GeometricsError::UnmatchedClassValue { side, value, .. }) => {
                assert_eq!(side, "test");
                assert_eq!(value, 9);
            }
            _ => panic!("Expected UnmatchedClassValue error"),
        }
    }

    #[test]
    fn test_pairs_by_position() {
        let reference = vec![MatchValue::Single(6), MatchValue::Single(17)];
        let test = vec![MatchValue::Single(6), MatchValue::Group(vec![])];
        let pairs = match_value_sets(&reference, &test, &[0, 6, 17], &[0, 6]).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].cls_value(), ClsValue::Same(vec![6]));
        assert_eq!(
            pairs[1].cls_value(),
            ClsValue::Pair {
                reference: vec![17],
                test: vec![]
            }
        );
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let reference = vec![MatchValue::Single(6), MatchValue::Single(17)];
        let test = vec![MatchValue::Single(6)];
        match match_value_sets(&reference, &test, &[6, 17], &[6]) {
            Err(GeometricsError::MismatchedMatchSets { reference, test }) => {
                assert_eq!((reference, test), (2, 1));
            }
            _ => panic!("Expected MismatchedMatchSets error"),
        }
    }

    #[test]
    fn test_cls_value_json() {
        let same = MatchPair {
            reference: vec![6],
            test: vec![6],
        };
        let differ = MatchPair {
            reference: vec![6],
            test: vec![1, 2],
        };
        assert_eq!(serde_json::to_string(&same.cls_value()).unwrap(), "[6]");
        assert_eq!(
            serde_json::to_string(&differ.cls_value()).unwrap(),
            r#"{"Ref":[6],"Test":[1,2]}"#
        );
    }

    #[test]
    fn test_builder_from_config() {
        let reference = labels(vec![6, 6, 0, 17], [2, 2]);
        let test = labels(vec![6, 0, 0, 0], [2, 2]);
        let config = ClassConfig::new();
        let builder = ClassMaskBuilder::new(&config, &reference, &test).unwrap();
        let (ref_mask, test_mask) = ClassMaskBuilder::masks(&builder.pairs()[0], &reference, &test);

        assert_eq!(count_true(&ref_mask), 2);
        assert_eq!(count_true(&test_mask), 1);
    }
}
