use thiserror::Error;

/// The error type for `core3d-geometrics` operations.
///
/// Every variant is fatal for the evaluation run that raised it. Degenerate
/// inputs such as an empty set of scored pixels are not errors; they surface
/// as `None` fractions in the metric records instead.
#[derive(Error, Debug)]
pub enum GeometricsError {
    /// A configured class match value never occurs in the raster it is matched against.
    #[error("{side} classification has no pixels with match value {value} (observed values: {observed:?})")]
    UnmatchedClassValue {
        /// Which raster the value was configured for ("reference" or "test").
        side: String,
        /// The configured match value.
        value: i64,
        /// The distinct values actually present in the raster.
        observed: Vec<i64>,
    },

    /// Reference and test match-value lists cannot be paired by position.
    #[error("Reference and test match-value lists differ in length: {reference} vs {test}")]
    MismatchedMatchSets {
        /// Number of reference match-value sets.
        reference: usize,
        /// Number of test match-value sets.
        test: usize,
    },

    /// The test-ignore mode is not one of the recognized values.
    #[error("Unrecognized test ignore value={value}")]
    UnsupportedTestIgnore {
        /// The rejected mode value.
        value: u8,
    },

    /// The evaluation configuration is logically inconsistent.
    #[error("Invalid evaluation configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Two rasters of one evaluation run do not share the same shape.
    #[error("Raster shape mismatch for {layer}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the offending layer.
        layer: String,
        /// Shape of the reference layer, `[rows, cols]`.
        expected: [usize; 2],
        /// Shape of the offending layer, `[rows, cols]`.
        actual: [usize; 2],
    },

    /// The ignore mask excludes every pixel, leaving nothing to evaluate.
    #[error("All pixels are ignored")]
    AllPixelsIgnored,

    /// A scored material label falls outside the defined label range.
    #[error("Material label {label} is outside the {count} defined material names")]
    MaterialLabelOutOfRange {
        /// The offending label value.
        label: i64,
        /// Number of defined material names.
        count: usize,
    },

    /// An external metric implementation failed.
    #[error("Metric {metric} failed: {reason}")]
    MetricFailed {
        /// Name of the metric.
        metric: String,
        /// Failure description reported by the metric.
        reason: String,
    },
}

/// A specialized `Result` type for `core3d-geometrics` operations.
pub type GeometricsResult<T> = Result<T, GeometricsError>;
