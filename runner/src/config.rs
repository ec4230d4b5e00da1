//! Run configuration for `run_geometrics`.
//!
//! A run configuration names the reference and test rasters, their no-data
//! values and the evaluation settings. File names may be relative; they are
//! resolved against the reference and test folders with [`RunConfig::resolve`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use core3d_geometrics::{EvaluationConfig, GeoTransform, NoDataValues};
use serde::{Deserialize, Deserializer, Serialize};

/// Reference model rasters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceFiles {
    pub dsm: PathBuf,
    pub dtm: PathBuf,
    pub cls: PathBuf,
    /// Structure index raster, needed for material scoring.
    #[serde(default)]
    pub ndx: Option<PathBuf>,
    #[serde(default)]
    pub mtl: Option<PathBuf>,
}

/// Test model rasters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestFiles {
    pub dsm: PathBuf,
    #[serde(default)]
    pub dtm: Option<PathBuf>,
    pub cls: PathBuf,
    #[serde(default)]
    pub mtl: Option<PathBuf>,
}

/// Configuration of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub reference: ReferenceFiles,
    pub test: TestFiles,
    #[serde(default)]
    pub no_data: NoDataValues,
    /// Geotransform shared by all co-registered rasters.
    #[serde(default)]
    pub geotransform: GeoTransform,
    /// Test-to-reference offset `[x, y, z]`, applied when alignment is enabled.
    #[serde(default)]
    pub registration_offset: Option<[f64; 3]>,
    /// Reference material codes merged into another code before scoring.
    #[serde(default)]
    pub material_remap: BTreeMap<i64, i64>,
    /// Evaluation settings; omitted sections and fields keep their defaults.
    #[serde(default = "EvaluationConfig::new", deserialize_with = "partial_evaluation")]
    pub evaluation: EvaluationConfig,
}

fn partial_evaluation<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EvaluationConfig, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    EvaluationConfig::from_json_value(value).map_err(serde::de::Error::custom)
}

impl RunConfig {
    /// Read a JSON run configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Make every raster path absolute and check that the files exist.
    ///
    /// # Errors
    ///
    /// Fails on the first configured file that does not exist.
    pub fn resolve(&mut self, reference_dir: &Path, test_dir: &Path) -> Result<()> {
        let reference = &mut self.reference;
        for path in [&mut reference.dsm, &mut reference.dtm, &mut reference.cls] {
            *path = resolve_file(reference_dir, path)?;
        }
        for path in [&mut reference.ndx, &mut reference.mtl].into_iter().flatten() {
            *path = resolve_file(reference_dir, path)?;
        }

        let test = &mut self.test;
        for path in [&mut test.dsm, &mut test.cls] {
            *path = resolve_file(test_dir, path)?;
        }
        for path in [&mut test.dtm, &mut test.mtl].into_iter().flatten() {
            *path = resolve_file(test_dir, path)?;
        }
        Ok(())
    }
}

fn resolve_file(dir: &Path, path: &Path) -> Result<PathBuf> {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    };
    if !resolved.is_file() {
        anyhow::bail!("Input file does not exist: {}", resolved.display());
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core3d_geometrics::MatchValue;

    const MINIMAL: &str = r#"{
        "reference": {"dsm": "ref_dsm.tif", "dtm": "ref_dtm.tif", "cls": "ref_cls.tif"},
        "test": {"dsm": "test_dsm.tif", "cls": "test_cls.tif"}
    }"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("geometrics-runner-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config: RunConfig = serde_json::from_str(MINIMAL).unwrap();

        assert!(config.test.dtm.is_none());
        assert!(config.reference.ndx.is_none());
        assert!(config.registration_offset.is_none());
        assert!(config.material_remap.is_empty());
        assert_eq!(config.no_data, NoDataValues::default());
        assert_eq!(config.geotransform, GeoTransform::default());
        assert!(config.evaluation.validate().is_ok());
    }

    #[test]
    fn test_partial_evaluation_block() {
        let json = MINIMAL.replacen(
            '{',
            r#"{"evaluation": {"options": {"quantize_height": true}, "materials": {"ignore": [0]}},"#,
            1,
        );
        let config: RunConfig = serde_json::from_str(&json).unwrap();

        let evaluation = &config.evaluation;
        assert!(evaluation.options.quantize_height);
        assert!((evaluation.options.terrain_z_error_threshold - 1.0).abs() < f64::EPSILON);
        assert_eq!(evaluation.materials.ignore, vec![0]);
        assert_eq!(evaluation.materials.names.len(), 14);
        assert_eq!(evaluation.classes.reference, vec![MatchValue::Single(6)]);
    }

    #[test]
    fn test_bad_evaluation_field_is_rejected() {
        let json = MINIMAL.replacen('{', r#"{"evaluation": {"classes": {"reference": "6"}},"#, 1);
        let err = serde_json::from_str::<RunConfig>(&json).unwrap_err();
        assert!(err.to_string().contains("Malformed configuration"));
    }

    #[test]
    fn test_material_remap_keys() {
        let json = MINIMAL.replacen('{', r#"{"material_remap": {"2": 1},"#, 1);
        let config: RunConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.material_remap.get(&2), Some(&1));
    }

    #[test]
    fn test_resolve_relative_paths() {
        let reference_dir = scratch_dir("ref");
        let test_dir = scratch_dir("test");
        for name in ["ref_dsm.tif", "ref_dtm.tif", "ref_cls.tif"] {
            fs::write(reference_dir.join(name), b"").unwrap();
        }
        for name in ["test_dsm.tif", "test_cls.tif"] {
            fs::write(test_dir.join(name), b"").unwrap();
        }

        let mut config: RunConfig = serde_json::from_str(MINIMAL).unwrap();
        config.resolve(&reference_dir, &test_dir).unwrap();

        assert_eq!(config.reference.cls, reference_dir.join("ref_cls.tif"));
        assert_eq!(config.test.dsm, test_dir.join("test_dsm.tif"));

        fs::remove_dir_all(reference_dir).unwrap();
        fs::remove_dir_all(test_dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = scratch_dir("missing");
        let mut config: RunConfig = serde_json::from_str(MINIMAL).unwrap();

        let err = config.resolve(&dir, &dir).unwrap_err();
        assert!(err.to_string().contains("ref_dsm.tif"));

        fs::remove_dir_all(dir).unwrap();
    }
}
