//! Enumeration types for the evaluation configuration.

use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GeometricsError, GeometricsResult};

/// Which test-side no-data values are added to the ignore mask.
#[derive(Config, Debug, PartialEq, Eq)]
pub enum TestIgnoreMode {
    /// Only reference no-data values are ignored.
    Off,
    /// Also ignore pixels where the test classification holds its no-data value.
    Classification,
    /// Also ignore pixels where the test DSM (or DTM, when given) holds the no-data value.
    Elevation,
}

impl TryFrom<u8> for TestIgnoreMode {
    type Error = GeometricsError;

    fn try_from(value: u8) -> GeometricsResult<Self> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Classification),
            2 => Ok(Self::Elevation),
            _ => Err(GeometricsError::UnsupportedTestIgnore { value }),
        }
    }
}

/// One configured entry of a match-value list.
///
/// A bare code is a singleton set; a list groups several class codes into one
/// logical class. An empty list is only meaningful on the test side, where it
/// stands for "no test detections for this class".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchValue {
    /// A single class code.
    Single(i64),
    /// Several class codes evaluated together.
    Group(Vec<i64>),
}

impl MatchValue {
    /// Class codes of this entry, in configured order.
    #[must_use]
    pub fn codes(&self) -> Vec<i64> {
        match self {
            Self::Single(code) => vec![*code],
            Self::Group(codes) => codes.clone(),
        }
    }

    /// Returns `true` if the entry names no class code at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Group(codes) if codes.is_empty())
    }
}

impl From<i64> for MatchValue {
    fn from(code: i64) -> Self {
        Self::Single(code)
    }
}

impl From<Vec<i64>> for MatchValue {
    fn from(codes: Vec<i64>) -> Self {
        Self::Group(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_mode_from_u8() {
        assert_eq!(TestIgnoreMode::try_from(0).unwrap(), TestIgnoreMode::Off);
        assert_eq!(
            TestIgnoreMode::try_from(1).unwrap(),
            TestIgnoreMode::Classification
        );
        assert_eq!(
            TestIgnoreMode::try_from(2).unwrap(),
            TestIgnoreMode::Elevation
        );
        match TestIgnoreMode::try_from(3) {
            Err(GeometricsError::UnsupportedTestIgnore { value }) => assert_eq!(value, 3),
            _ => panic!("Expected UnsupportedTestIgnore error"),
        }
    }

    #[test]
    fn test_match_value_json_forms() {
        let values: Vec<MatchValue> = serde_json::from_str("[6, [2, 3], []]").unwrap();
        assert_eq!(values[0], MatchValue::Single(6));
        assert_eq!(values[1].codes(), vec![2, 3]);
        assert!(values[2].is_empty());
        assert!(!values[0].is_empty());
    }
}
