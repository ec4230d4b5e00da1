//! Aggregated evaluation report.

use serde::Serialize;

use crate::{
    evaluation::{MetricRecord, TaggedResult},
    materials::MaterialMetrics,
};

/// Everything one evaluation run produced, ready for JSON serialization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeometricsReport {
    /// One record per match-value pair, in configured order.
    pub threshold_geometry: Vec<TaggedResult>,
    /// Records of the pairs that passed the degenerate-mask rule.
    pub relative_accuracy: Vec<TaggedResult>,
    /// Test-to-reference offset applied when alignment was enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_offset: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain_accuracy: Option<MetricRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_materials: Option<MaterialMetrics>,
    /// Pixels excluded from every metric.
    #[serde(skip)]
    pub data_voids: usize,
}

impl GeometricsReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Fails only if a metric record holds a non-serializable value.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
