//! `core3d-geometrics`: geometry, elevation and material accuracy metrics for
//! 3D models rasterized onto a common grid.
//!
//! Rasters are burn tensors, so every evaluation stage runs on any backend.
//! The entry point is [`run_evaluation`], which scores a test model against a
//! reference model as configured by an [`EvaluationConfig`].

pub mod config;
pub mod error;
pub mod evaluation;
pub mod masks;
pub mod materials;
pub mod metrics;
pub mod pipeline;
pub mod preparation;
pub mod raster;
pub mod report;

#[cfg(test)]
mod tests;

pub use config::{ClassConfig, EvaluationConfig, MatchValue, MaterialConfig, OptionsConfig, TestIgnoreMode};
pub use error::{GeometricsError, GeometricsResult};
pub use masks::{ClassMaskBuilder, ClsValue, MatchPair};
pub use materials::{material_map, run_material_metrics, MaterialMetrics};
pub use pipeline::{run_evaluation, EvaluationInputs, MetricSuite};
pub use preparation::NoDataValues;
pub use raster::{GeoTransform, DEFAULT_NO_DATA, NO_MATERIAL, NO_STRUCTURE};
pub use report::GeometricsReport;
