//! Core configuration structures for an evaluation run.
//!
//! The configuration enumerates exactly the recognized fields. It is
//! validated once with [`EvaluationConfig::validate`] before any raster is
//! touched; the rest of the crate assumes a validated configuration.

use std::collections::BTreeSet;

use crate::error::{GeometricsError, GeometricsResult};
use burn::prelude::*;
use serde_json::Value;

use super::enums::*;

/// Main configuration for an evaluation run.
#[derive(Config, Debug)]
pub struct EvaluationConfig {
    /// Class match values driving the threshold geometry evaluation.
    #[config(default = "ClassConfig::new()")]
    pub classes: ClassConfig,
    /// Material names and the labels ignored in material scoring.
    #[config(default = "MaterialConfig::new()")]
    pub materials: MaterialConfig,
    /// Evaluation options.
    #[config(default = "OptionsConfig::new()")]
    pub options: OptionsConfig,
}

/// Positionally paired reference and test match values.
///
/// Entry `i` of `reference` is evaluated against entry `i` of `test`, which
/// allows a reference class code to be compared with a differently coded but
/// equivalent test class.
#[derive(Config, Debug)]
pub struct ClassConfig {
    /// Match values applied to the reference classification.
    #[config(default = "vec![MatchValue::Single(6)]")]
    pub reference: Vec<MatchValue>,
    /// Match values applied to the test classification.
    #[config(default = "vec![MatchValue::Single(6)]")]
    pub test: Vec<MatchValue>,
}

/// Material labeling configuration.
#[derive(Config, Debug)]
pub struct MaterialConfig {
    /// Material names; label `i` of a material raster is named `names[i]`.
    #[config(default = "crate::materials::default_material_names()")]
    pub names: Vec<String>,
    /// Truth labels excluded from material scoring.
    #[config(default = "vec![0, 12, 13]")]
    pub ignore: Vec<i64>,
}

/// Evaluation options.
#[derive(Config, Debug)]
pub struct OptionsConfig {
    /// Round all heights to multiples of the horizontal unit height.
    #[config(default = "false")]
    pub quantize_height: bool,
    /// Height difference (in elevation units) tolerated by the terrain metric.
    #[config(default = "1.0")]
    pub terrain_z_error_threshold: f64,
    /// Reference classes whose underlying terrain is excluded from terrain scoring.
    #[config(default = "vec![MatchValue::Single(6), MatchValue::Single(17)]")]
    pub terrain_cls_ignore_values: Vec<MatchValue>,
    /// Test-side no-data handling for the ignore mask.
    #[config(default = "TestIgnoreMode::Off")]
    pub test_ignore: TestIgnoreMode,
}

impl EvaluationConfig {
    /// Parse a JSON configuration in which any section or field may be left out.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeometricsError::InvalidConfiguration)` if the text is not
    /// valid JSON or a given field has the wrong type.
    pub fn from_json(json: &str) -> GeometricsResult<Self> {
        let value = serde_json::from_str(json).map_err(invalid_json)?;
        Self::from_json_value(value)
    }

    /// Overlay `value` on the default configuration.
    ///
    /// Objects are merged key by key; any other given value replaces the
    /// default, so match-value lists are never merged element-wise.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeometricsError::InvalidConfiguration)` if a given field
    /// has the wrong type.
    pub fn from_json_value(value: Value) -> GeometricsResult<Self> {
        let mut merged = serde_json::to_value(Self::new()).map_err(invalid_json)?;
        overlay(&mut merged, value);
        serde_json::from_value(merged).map_err(invalid_json)
    }

    /// Validate the configuration and return appropriate errors for invalid settings.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeometricsError::MismatchedMatchSets)` if the reference and
    /// test match-value lists cannot be paired, and
    /// `Err(GeometricsError::InvalidConfiguration)` for any other violated rule.
    pub fn validate(&self) -> GeometricsResult<()> {
        self.classes.validate()?;
        self.materials.validate()?;

        let threshold = self.options.terrain_z_error_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(GeometricsError::InvalidConfiguration {
                reason: format!("Terrain z error threshold must be positive, got {threshold}"),
            });
        }

        Ok(())
    }
}

fn overlay(base: &mut Value, value: Value) {
    match (base, value) {
        (Value::Object(base), Value::Object(value)) => {
            for (key, field) in value {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, field),
                    None => {
                        base.insert(key, field);
                    }
                }
            }
        }
        (base, value) => *base = value,
    }
}

fn invalid_json(err: serde_json::Error) -> GeometricsError {
    GeometricsError::InvalidConfiguration {
        reason: format!("Malformed configuration: {err}"),
    }
}

impl ClassConfig {
    /// Check that the match-value lists can be paired by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the lists are empty, differ in length or a
    /// reference entry names no class code.
    pub fn validate(&self) -> GeometricsResult<()> {
        if self.reference.len() != self.test.len() {
            return Err(GeometricsError::MismatchedMatchSets {
                reference: self.reference.len(),
                test: self.test.len(),
            });
        }
        if self.reference.is_empty() {
            return Err(GeometricsError::InvalidConfiguration {
                reason: "At least one class match value is required".to_string(),
            });
        }
        if let Some(index) = self.reference.iter().position(MatchValue::is_empty) {
            return Err(GeometricsError::InvalidConfiguration {
                reason: format!("Reference match value set {index} is empty"),
            });
        }
        Ok(())
    }
}

impl MaterialConfig {
    /// Check that the ignored labels refer to defined material names.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeometricsError::InvalidConfiguration)` if no material is
    /// defined or an ignored label is out of range.
    pub fn validate(&self) -> GeometricsResult<()> {
        if self.names.is_empty() {
            return Err(GeometricsError::InvalidConfiguration {
                reason: "Material names must not be empty".to_string(),
            });
        }
        if let Some(label) = self
            .ignore
            .iter()
            .find(|&&label| label < 0 || label as usize >= self.names.len())
        {
            return Err(GeometricsError::InvalidConfiguration {
                reason: format!(
                    "Ignored material index {label} is outside the {} defined materials",
                    self.names.len()
                ),
            });
        }
        Ok(())
    }

    /// Ignored truth labels as a set.
    #[must_use]
    pub fn ignore_set(&self) -> BTreeSet<i64> {
        self.ignore.iter().copied().collect()
    }

    /// Names of the ignored materials, for logging.
    #[must_use]
    pub fn ignored_names(&self) -> Vec<&str> {
        crate::materials::label_names(&self.names, self.ignore.iter().copied())
    }
}
