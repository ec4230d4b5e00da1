//! Square truth × test confusion matrix.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{GeometricsError, GeometricsResult};

/// Counts of units (pixels or structures) by truth label (row) and test label (column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    size: usize,
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    /// An all-zero `size × size` matrix.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            counts: vec![0; size * size],
        }
    }

    /// Number of labels.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Count one unit with truth label `truth` and test label `test`.
    ///
    /// # Errors
    ///
    /// Returns `MaterialLabelOutOfRange` if either label is negative or not
    /// smaller than [`size`](Self::size).
    pub fn record(&mut self, truth: i64, test: i64) -> GeometricsResult<()> {
        let row = self.index(truth)?;
        let col = self.index(test)?;
        self.counts[row * self.size + col] += 1;
        Ok(())
    }

    /// Count at `(truth, test)`.
    #[must_use]
    pub fn get(&self, truth: usize, test: usize) -> u64 {
        self.counts[truth * self.size + test]
    }

    /// Total scored units.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Correctly classified units.
    #[must_use]
    pub fn trace(&self) -> u64 {
        (0..self.size).map(|i| self.get(i, i)).sum()
    }

    /// `trace / total`, or `None` when nothing was scored.
    #[must_use]
    pub fn fraction_correct(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.trace() as f64 / total as f64)
    }

    /// Rows of the matrix, one per truth label.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.counts
            .chunks(self.size.max(1))
            .map(<[u64]>::to_vec)
            .collect()
    }

    fn index(&self, label: i64) -> GeometricsResult<usize> {
        usize::try_from(label)
            .ok()
            .filter(|&index| index < self.size)
            .ok_or(GeometricsError::MaterialLabelOutOfRange {
                label,
                count: self.size,
            })
    }
}

impl Serialize for ConfusionMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .map(|count| count.to_string().len())
            .max()
            .unwrap_or(1);
        for row in self.rows() {
            let cells: Vec<String> = row.iter().map(|count| format!("{count:>width$}")).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
