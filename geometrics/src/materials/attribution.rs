//! Majority material attribution for a structure footprint.

use std::collections::{BTreeMap, BTreeSet};

use super::structure::PixelCoord;
use crate::raster::LabelGrid;

/// Pixel counts per material label inside one footprint.
///
/// Ignored labels are tallied too, so a footprint covered only by ignored
/// labels can be told apart from one that received no label at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTally {
    counts: BTreeMap<i64, usize>,
}

impl MaterialTally {
    /// Count the material label under each pixel.
    #[must_use]
    pub fn from_pixels(materials: &LabelGrid, pixels: &[PixelCoord]) -> Self {
        let mut counts = BTreeMap::new();
        for &(x, y) in pixels {
            *counts.entry(materials.get(x, y)).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Pixel count of one label.
    #[must_use]
    pub fn count(&self, label: i64) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    /// Total tallied pixels.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Most abundant label outside `ignore`, lowest label on ties.
    #[must_use]
    pub fn dominant(&self, ignore: &BTreeSet<i64>) -> Option<i64> {
        Self::max_by_count(
            self.counts
                .iter()
                .filter(|(label, _)| !ignore.contains(label)),
        )
    }

    /// Most abundant label of any kind, lowest label on ties.
    #[must_use]
    pub fn dominant_any(&self) -> Option<i64> {
        Self::max_by_count(self.counts.iter())
    }

    // Labels arrive in ascending order; only a strictly greater count replaces
    // the current best, so the lowest label wins a tie.
    fn max_by_count<'a>(entries: impl Iterator<Item = (&'a i64, &'a usize)>) -> Option<i64> {
        let mut best: Option<(i64, usize)> = None;
        for (&label, &count) in entries {
            let replaces = match best {
                Some((_, best_count)) => count > best_count,
                None => count > 0,
            };
            if replaces {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Most frequent material label among `pixels`, excluding `ignore`.
///
/// Ties are broken by the lowest label index. Returns `None` when no pixel
/// carries a label outside the ignore set; this is reported as
/// [`NO_MATERIAL`](crate::raster::NO_MATERIAL).
#[must_use]
pub fn primary_material(
    materials: &LabelGrid,
    pixels: &[PixelCoord],
    ignore: &BTreeSet<i64>,
) -> Option<i64> {
    MaterialTally::from_pixels(materials, pixels).dominant(ignore)
}
