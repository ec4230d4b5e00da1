//! Metric dispatch over class masks.
//!
//! - `input`: inputs handed to metric implementations
//! - `metric`: the metric traits
//! - `threshold`: the multi-threshold evaluator over match-value pairs
//! - `terrain`: terrain mask construction and terrain metric dispatch

pub mod input;
pub mod metric;
pub mod terrain;
pub mod threshold;

pub use input::{MetricRecord, RelativeAccuracyInput, TerrainAccuracyInput, ThresholdGeometryInput};
pub use metric::{RelativeAccuracyMetric, TerrainAccuracyMetric, ThresholdGeometryMetric};
pub use terrain::{run_terrain_accuracy, terrain_mask};
pub use threshold::{MultiThresholdEvaluator, TaggedResult, ThresholdLayers, ThresholdResults};
